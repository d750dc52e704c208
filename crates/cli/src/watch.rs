//! Watch mode: run interval selectors on background workers.
use std::future::Future;

use anyhow::Result;
use probability_core::ProbabilityError;
use probability_runtime::{
    DriverRegistry, ParameterTable, RecalculationWorker, RuntimeError, SelectionEvent,
    TriggerPolicy, WorkerHandle,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Final state of one watched selector.
#[derive(Debug)]
pub struct WatchOutcome {
    pub selector: String,
    pub value: i32,
    pub parameters: ParameterTable,
}

/// Spawns a worker per enabled interval driver and logs their events until
/// `stop` completes.
pub async fn watch<F>(registry: DriverRegistry, stop: F) -> Result<Vec<WatchOutcome>>
where
    F: Future<Output = ()>,
{
    let mut workers = Vec::new();
    let mut loggers = Vec::new();

    for driver in registry.into_drivers() {
        let runs_on_timer = matches!(driver.policy(), TriggerPolicy::Interval(_));
        if !runs_on_timer || !driver.is_enabled() {
            info!(selector = %driver.name(), policy = ?driver.policy(), "not watched");
            continue;
        }

        let (handle, join) = RecalculationWorker::spawn(driver, ParameterTable::new());
        loggers.push(tokio::spawn(log_events(handle.clone())));
        workers.push((handle, join));
    }

    if workers.is_empty() {
        warn!("no enabled interval selectors to watch");
        return Ok(Vec::new());
    }

    stop.await;

    let mut outcomes = Vec::with_capacity(workers.len());
    for (handle, join) in workers {
        handle.shutdown().await.map_err(report)?;
        drop(handle);
        let (driver, parameters) = join
            .await
            .map_err(|e| report(RuntimeError::WorkerJoin(e)))?;
        outcomes.push(WatchOutcome {
            selector: driver.name().to_owned(),
            value: driver.current_value(),
            parameters,
        });
    }

    for logger in loggers {
        logger
            .await
            .map_err(|e| report(RuntimeError::WorkerJoin(e)))?;
    }

    Ok(outcomes)
}

/// Logs a worker error with its code and severity before it is propagated.
fn report(err: RuntimeError) -> RuntimeError {
    tracing::error!(
        code = err.error_code(),
        severity = err.severity().as_str(),
        "{}",
        err
    );
    err
}

fn log_events(handle: WorkerHandle) -> impl Future<Output = ()> {
    let mut events = handle.subscribe();
    drop(handle);
    async move {
        loop {
            match events.recv().await {
                Ok(SelectionEvent::Selected {
                    selector,
                    value,
                    draw,
                    resolution,
                    source,
                }) => info!(%selector, value, draw, %resolution, ?source, "selected"),
                Ok(SelectionEvent::EnabledChanged { selector, enabled }) => {
                    info!(%selector, enabled, "enabled changed")
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    }
}
