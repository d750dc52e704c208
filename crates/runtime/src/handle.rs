use tokio::sync::{broadcast, mpsc, oneshot};

use probability_core::{Diagnostics, Selection};

use crate::error::{Result, RuntimeError};
use crate::event::SelectionEvent;
use crate::worker::Command;

/// Client-facing handle to a recalculation worker
#[derive(Clone)]
pub struct WorkerHandle {
    selector: String,
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SelectionEvent>,
}

impl WorkerHandle {
    pub(crate) fn new(
        selector: String,
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<SelectionEvent>,
    ) -> Self {
        Self {
            selector,
            command_tx,
            event_tx,
        }
    }

    /// Name of the selector served by the worker
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Recompute immediately and return the selection (`None` for an empty selector)
    pub async fn recalculate(&self) -> Result<Option<Selection>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Recalculate { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Turn automatic recalculation on or off; returns whether the flag changed
    pub async fn set_enabled(&self, enabled: bool) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SetEnabled {
                enabled,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the selector's diagnostics
    pub async fn diagnostics(&self) -> Result<Diagnostics> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryDiagnostics { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the worker to stop
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to selection events
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionEvent> {
        self.event_tx.subscribe()
    }
}
