//! Events flowing from the producer stage to the consumer stage.

/// One message on a run's event queue, delivered to callbacks in FIFO order.
///
/// A run's stream is: at most one `AverageDurationAnnounced` (prediction mode
/// only, before any progress), zero or more `ProgressUpdated`, and exactly
/// one terminal `Completed` or `Cancelled`. Nothing follows the terminal event.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// Historical average for the task, announced once before any progress.
    AverageDurationAnnounced { average_secs: f64 },
    /// Progress advanced. `estimated_remaining_secs` is None outside prediction mode.
    ProgressUpdated {
        progress: f64,
        estimated_remaining_secs: Option<f64>,
    },
    /// Run reached 100%; `actual_secs` is what gets recorded to history.
    Completed { actual_secs: f64 },
    /// Run was cancelled; nothing is recorded.
    Cancelled,
}

/// Caller-supplied callbacks invoked by the consumer stage.
///
/// Every callback is optional; a missing one is a no-op. Callbacks run only
/// on the consumer stage, one at a time, in event order.
#[derive(Default)]
pub struct SimulationHandlers {
    pub(super) on_average_announced: Option<Box<dyn FnMut(f64) + Send>>,
    pub(super) on_progress: Option<Box<dyn FnMut(f64, Option<f64>) + Send>>,
    pub(super) on_completed: Option<Box<dyn FnMut(f64) + Send>>,
}

impl SimulationHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once with the historical average when the task has history.
    pub fn on_average_announced(mut self, f: impl FnMut(f64) + Send + 'static) -> Self {
        self.on_average_announced = Some(Box::new(f));
        self
    }

    /// Called per progress event with (progress %, estimated remaining secs).
    pub fn on_progress(mut self, f: impl FnMut(f64, Option<f64>) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called once with the actual duration when the run completes.
    pub fn on_completed(mut self, f: impl FnMut(f64) + Send + 'static) -> Self {
        self.on_completed = Some(Box::new(f));
        self
    }
}
