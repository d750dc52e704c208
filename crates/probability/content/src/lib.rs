//! Data-driven selector definitions and loaders.
//!
//! This crate describes selectors as data ([`SelectorSpec`], grouped into a
//! [`Catalog`]) and loads them from RON or TOML files. Loading validates the
//! catalog and reports authoring advisories through `tracing`.
//!
//! Specs are consumed by the runtime, which builds drivers from them.

pub mod spec;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use spec::{
    Advisory, Catalog, CatalogError, DEFAULT_INTERVAL_SECONDS, ParameterKind, ParameterSpec,
    SelectorSpec, TriggerSpec, interval_duration,
};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogFormat, CatalogLoader, LoadResult};
