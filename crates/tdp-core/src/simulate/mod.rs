//! Two-stage simulation pipeline with adaptive remaining-time estimation.
//!
//! A producer task advances the simulated clock, feeds the progress tracker,
//! and emits events onto a bounded queue; the consumer drains the queue and
//! invokes the caller's callbacks in emission order. Cancellation is a shared
//! token observed by both stages; the queue closes when the producer's sender
//! drops, on every exit path, so neither stage can block forever.

mod consumer;
mod event;
mod producer;

#[cfg(test)]
mod tests;

pub use event::{SimulationEvent, SimulationHandlers};

use anyhow::anyhow;

use crate::config::TdpConfig;
use crate::control::CancelToken;
use crate::error::SimulateError;
use crate::history::HistoryStore;

/// How a run settled. Cancellation is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunOutcome {
    /// Run reached 100%; `actual_secs` was recorded to history.
    Completed { actual_secs: f64 },
    /// Cancellation was honored; nothing was recorded.
    Cancelled,
}

/// Simulate one run of `task_name`, invoking `handlers` as it progresses.
///
/// Rejects an empty task name before starting any stage. Otherwise spawns
/// the producer, runs the consumer on the calling task (so callbacks execute
/// in the caller's context, never concurrently), and settles once both
/// stages finish or cancellation is honored. Each invocation owns its own
/// queue, estimator, and parameters; only the history store is shared.
pub async fn simulate(
    store: &HistoryStore,
    cfg: &TdpConfig,
    task_name: &str,
    handlers: SimulationHandlers,
    cancel: CancelToken,
) -> Result<RunOutcome, SimulateError> {
    if task_name.is_empty() {
        return Err(SimulateError::InvalidTaskName);
    }

    let (tx, rx) = tokio::sync::mpsc::channel(cfg.queue_capacity.max(1));
    let producer = tokio::spawn(producer::run_producer(
        store.clone(),
        cfg.clone(),
        task_name.to_string(),
        tx,
        cancel,
    ));

    let mut handlers = handlers;
    consumer::run_consumer(rx, &mut handlers).await;

    let outcome = producer
        .await
        .map_err(|e| SimulateError::Stage(anyhow!("producer stage failed: {e}")))??;

    Ok(match outcome {
        producer::ProducerOutcome::Completed { actual_secs } => RunOutcome::Completed { actual_secs },
        producer::ProducerOutcome::Cancelled => RunOutcome::Cancelled,
    })
}
