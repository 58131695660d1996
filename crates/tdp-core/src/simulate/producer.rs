//! Producer stage: advances the simulated clock and emits progress events.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::Duration;

use crate::config::TdpConfig;
use crate::control::CancelToken;
use crate::error::SimulateError;
use crate::history::HistoryStore;
use crate::params;
use crate::tracker::ProgressTracker;

use super::event::SimulationEvent;

/// Bounds of the mean-reverting variability walk applied to raw progress.
const VARIABILITY_MIN: f64 = 0.8;
const VARIABILITY_MAX: f64 = 1.2;

/// How the producer stage ended. The matching terminal event has already
/// been queued when this is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum ProducerOutcome {
    Completed { actual_secs: f64 },
    Cancelled,
}

/// Run one simulated task to completion or cancellation, emitting events on
/// `tx`. Emits exactly one terminal event; writes history exactly once, and
/// only on completion. Dropping `tx` on return closes the queue so the
/// consumer can never block forever, including on the error path.
pub(super) async fn run_producer(
    store: HistoryStore,
    cfg: TdpConfig,
    task_name: String,
    tx: Sender<SimulationEvent>,
    cancel: CancelToken,
) -> Result<ProducerOutcome, SimulateError> {
    let mut rng = StdRng::from_entropy();

    if cancel.is_cancelled() {
        let _ = tx.send(SimulationEvent::Cancelled).await;
        return Ok(ProducerOutcome::Cancelled);
    }

    let params = params::resolve_with_rng(&store, &cfg.randomness, &task_name, &mut rng);
    tracing::debug!(
        task = %task_name,
        target_secs = params.target_secs,
        prediction = params.use_prediction,
        "simulation parameters resolved"
    );

    if params.use_prediction {
        let announce = SimulationEvent::AverageDurationAnnounced {
            average_secs: params.historical_avg,
        };
        if tx.send(announce).await.is_err() {
            // Receiver gone: the run was abandoned, treat as cancelled.
            return Ok(ProducerOutcome::Cancelled);
        }
    }

    let initial_estimate = if params.use_prediction {
        params.historical_avg
    } else {
        params.target_secs
    };
    let mut tracker = ProgressTracker::new(initial_estimate, &cfg.estimator);

    let tick = Duration::from_millis(cfg.tick_millis.max(1));
    let tick_secs = tick.as_secs_f64();
    let mut elapsed_secs = 0.0;
    let mut progress: f64 = 0.0;
    let mut variability = 1.0;
    let mut cancelled = false;

    while progress < 100.0 {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        tokio::time::sleep(tick).await;
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        // Simulated clock: one tick with ±10% jitter.
        elapsed_secs += tick_secs * (1.0 + (rng.gen::<f64>() - 0.5) * 0.2);

        // Random walk on the progress multiplier, clamped so noise stays bounded.
        variability = (variability + (rng.gen::<f64>() - 0.5) * 0.1)
            .clamp(VARIABILITY_MIN, VARIABILITY_MAX);

        // The raw fraction can dip when the walk drops; emitted progress never does.
        let raw = (elapsed_secs / params.target_secs * 100.0 * variability).min(100.0);
        progress = progress.max(raw);

        tracker.add_sample(progress, elapsed_secs);
        let estimate = tracker.update_estimate(progress, elapsed_secs);
        let estimated_remaining_secs = params
            .use_prediction
            .then(|| (estimate - elapsed_secs).max(0.0));

        let update = SimulationEvent::ProgressUpdated {
            progress,
            estimated_remaining_secs,
        };
        if tx.send(update).await.is_err() {
            return Ok(ProducerOutcome::Cancelled);
        }
    }

    if cancelled {
        let _ = tx.send(SimulationEvent::Cancelled).await;
        tracing::info!(task = %task_name, "simulation cancelled");
        return Ok(ProducerOutcome::Cancelled);
    }

    // Record the realized target, not the tick-quantized elapsed time, so the
    // history average converges to the mean of the generative distribution.
    let actual_secs = params.target_secs;
    let _ = tx
        .send(SimulationEvent::Completed { actual_secs })
        .await;
    store
        .record_duration(&task_name, actual_secs)
        .map_err(SimulateError::HistoryStore)?;
    tracing::info!(task = %task_name, actual_secs, "simulation completed");

    Ok(ProducerOutcome::Completed { actual_secs })
}
