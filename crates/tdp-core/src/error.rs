//! Error taxonomy for simulation runs.

use thiserror::Error;

/// Errors surfaced by [`simulate`](crate::simulate::simulate).
///
/// Cancellation is not an error: a cancelled run settles as
/// [`RunOutcome::Cancelled`](crate::simulate::RunOutcome::Cancelled) so
/// callers can tell it apart from real failures.
#[derive(Debug, Error)]
pub enum SimulateError {
    /// The task name was empty. Rejected before any stage starts.
    #[error("task name must not be empty")]
    InvalidTaskName,

    /// The history store failed while reading or writing durations.
    #[error("history store: {0}")]
    HistoryStore(#[source] anyhow::Error),

    /// A pipeline stage failed to run to completion (e.g. panicked).
    #[error("simulation stage: {0}")]
    Stage(#[source] anyhow::Error),
}
