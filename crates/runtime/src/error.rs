//! Runtime errors surfaced by worker handles.

use probability_core::{ErrorSeverity, ProbabilityError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("recalculation worker command channel closed")]
    CommandChannelClosed,

    #[error("recalculation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("recalculation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("selector '{0}' not found")]
    UnknownSelector(String),
}

impl ProbabilityError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::UnknownSelector(_) => ErrorSeverity::Validation,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::UnknownSelector(_) => "RUNTIME_UNKNOWN_SELECTOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_are_validation_and_channel_errors_internal() {
        let unknown = RuntimeError::UnknownSelector("idle".into());
        assert_eq!(unknown.severity(), ErrorSeverity::Validation);
        assert_eq!(unknown.error_code(), "RUNTIME_UNKNOWN_SELECTOR");

        let closed = RuntimeError::CommandChannelClosed;
        assert_eq!(closed.severity(), ErrorSeverity::Internal);
        assert_eq!(closed.error_code(), "RUNTIME_COMMAND_CHANNEL_CLOSED");
    }
}
