//! Consumer stage: drains the event queue and dispatches caller callbacks.

use tokio::sync::mpsc::Receiver;

use super::event::{SimulationEvent, SimulationHandlers};

/// Deliver events to the caller's callbacks strictly in emission order, until
/// a terminal `Cancelled` event or the queue closes (producer done). This is
/// pure dispatch; no computation happens here.
pub(super) async fn run_consumer(mut rx: Receiver<SimulationEvent>, handlers: &mut SimulationHandlers) {
    while let Some(event) = rx.recv().await {
        match event {
            SimulationEvent::AverageDurationAnnounced { average_secs } => {
                if let Some(cb) = handlers.on_average_announced.as_mut() {
                    cb(average_secs);
                }
            }
            SimulationEvent::ProgressUpdated {
                progress,
                estimated_remaining_secs,
            } => {
                if progress > 0.0 {
                    if let Some(cb) = handlers.on_progress.as_mut() {
                        cb(progress, estimated_remaining_secs);
                    }
                }
            }
            SimulationEvent::Completed { actual_secs } => {
                if let Some(cb) = handlers.on_completed.as_mut() {
                    cb(actual_secs);
                }
            }
            SimulationEvent::Cancelled => {
                tracing::debug!("consumer observed cancellation");
                break;
            }
        }
    }
}
