//! Background recalculation worker.
//!
//! The worker owns one [`SelectorDriver`] and its parameter sink, fires the
//! driver's interval timer with `tokio::time`, and serves commands from
//! [`crate::WorkerHandle`]s. Each selection is broadcast as a
//! [`SelectionEvent`].

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use probability_core::{Diagnostics, RandomSource, Selection};

use crate::binding::ParameterSink;
use crate::driver::SelectorDriver;
use crate::event::{SelectionEvent, TriggerSource};
use crate::handle::WorkerHandle;

/// Commands that can be sent to a recalculation worker
pub enum Command {
    /// Recompute now, regardless of the enable flag
    Recalculate {
        reply: oneshot::Sender<Option<Selection>>,
    },
    /// Switch automatic recalculation; replies whether the flag changed
    SetEnabled {
        enabled: bool,
        reply: oneshot::Sender<bool>,
    },
    /// Snapshot of the selector's last cycle
    QueryDiagnostics { reply: oneshot::Sender<Diagnostics> },
    /// Stop the worker loop
    Shutdown,
}

/// Worker that owns a driver and processes commands
pub struct RecalculationWorker<R, S> {
    driver: SelectorDriver<R>,
    sink: S,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<SelectionEvent>,
}

impl<R, S> RecalculationWorker<R, S>
where
    R: RandomSource + Send + 'static,
    S: ParameterSink + Send + 'static,
{
    /// Command queue depth per worker.
    pub const COMMAND_BUFFER: usize = 16;

    /// Event buffer per worker.
    pub const EVENT_CAPACITY: usize = 64;

    pub fn new(
        driver: SelectorDriver<R>,
        sink: S,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<SelectionEvent>,
    ) -> Self {
        Self {
            driver,
            sink,
            command_rx,
            event_tx,
        }
    }

    /// Spawns a worker for `driver` on the current tokio runtime.
    ///
    /// The join handle yields the driver and sink back once the worker stops.
    pub fn spawn(
        driver: SelectorDriver<R>,
        sink: S,
    ) -> (WorkerHandle, JoinHandle<(SelectorDriver<R>, S)>) {
        let (command_tx, command_rx) = mpsc::channel(Self::COMMAND_BUFFER);
        let (event_tx, _) = broadcast::channel(Self::EVENT_CAPACITY);

        let handle = WorkerHandle::new(driver.name().to_owned(), command_tx, event_tx.clone());
        let worker = Self::new(driver, sink, command_rx, event_tx);
        (handle, tokio::spawn(worker.run()))
    }

    /// Main worker loop
    pub async fn run(mut self) -> (SelectorDriver<R>, S) {
        let mut timer = self
            .driver
            .policy()
            .period()
            .filter(|period| !period.is_zero())
            .map(|period| {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval
            });

        info!(
            selector = %self.driver.name(),
            policy = ?self.driver.policy(),
            enabled = self.driver.is_enabled(),
            "RecalculationWorker started"
        );

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command, &mut timer),
                },
                _ = next_tick(&mut timer) => self.on_tick(),
            }
        }

        info!(selector = %self.driver.name(), "RecalculationWorker stopped");
        (self.driver, self.sink)
    }

    fn handle_command(&mut self, command: Command, timer: &mut Option<Interval>) {
        match command {
            Command::Recalculate { reply } => {
                let selection = self.driver.calculate_into(&mut self.sink);
                if let Some(selection) = &selection {
                    self.publish(SelectionEvent::selected(
                        self.driver.name(),
                        selection,
                        TriggerSource::Manual,
                    ));
                }
                let _ = reply.send(selection);
            }
            Command::SetEnabled { enabled, reply } => {
                let changed = self.driver.set_enabled(enabled);
                if changed {
                    if let Some(interval) = timer.as_mut() {
                        interval.reset();
                    }
                    self.publish(SelectionEvent::EnabledChanged {
                        selector: self.driver.name().to_owned(),
                        enabled,
                    });
                }
                let _ = reply.send(changed);
            }
            Command::QueryDiagnostics { reply } => {
                let _ = reply.send(self.driver.diagnostics());
            }
            Command::Shutdown => {}
        }
    }

    fn on_tick(&mut self) {
        let Some(period) = self.driver.policy().period() else {
            return;
        };
        let selections = self.driver.advance(period, &mut self.sink);
        for selection in &selections {
            debug!(
                selector = %self.driver.name(),
                value = selection.value,
                "timer recalculation"
            );
            self.publish(SelectionEvent::selected(
                self.driver.name(),
                selection,
                TriggerSource::Timer,
            ));
        }
    }

    fn publish(&self, event: SelectionEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!(selector = %self.driver.name(), "event dropped, no subscribers");
        }
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
