//! Composition layer that decides when selectors recompute and where their
//! values go.
//!
//! `probability-core` only knows how to pick a value. This crate adds the
//! surrounding policy without touching the selector:
//! - [`trigger`] maps catalog triggers to [`TriggerPolicy`] values
//! - [`driver`] wraps a selector with its policy, enable flag and binding
//! - [`binding`] forwards values to named integer or float parameters
//! - [`registry`] builds every driver of a catalog
//! - [`worker`] runs an interval driver on a tokio task, controlled through
//!   [`WorkerHandle`] and observed through [`SelectionEvent`] broadcasts
pub mod binding;
pub mod driver;
pub mod error;
pub mod event;
pub mod handle;
pub mod registry;
pub mod trigger;
pub mod worker;

pub use binding::{
    DiscardParameters, ParameterBinding, ParameterSink, ParameterTable, ParameterValue,
};
pub use driver::{DynRandom, SelectorDriver};
pub use error::{Result, RuntimeError};
pub use event::{SelectionEvent, TriggerSource};
pub use handle::WorkerHandle;
pub use registry::DriverRegistry;
pub use trigger::TriggerPolicy;
pub use worker::{Command, RecalculationWorker};
