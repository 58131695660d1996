//! Adaptive time-to-completion estimation from recent progress samples.
//!
//! The tracker keeps a short FIFO window of (progress, elapsed) observations,
//! derives a progress velocity from consecutive pairs, and blends the
//! extrapolated completion time with its initial (historical) estimate. Trust
//! in the initial estimate decays as live samples accumulate; it never climbs
//! back up within a run.

use std::collections::VecDeque;

use crate::config::EstimatorConfig;

/// One (percentage-complete, elapsed-seconds) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Percentage complete, in [0, 100].
    pub progress: f64,
    /// Seconds elapsed on the run's clock when the sample was taken.
    pub elapsed_secs: f64,
}

/// Velocity reported while the window holds fewer than two usable samples:
/// callers fall back to a naive proportional estimate.
const NEUTRAL_VELOCITY: f64 = 1.0;

/// Progress below this threshold carries too little signal to update the estimate.
const MIN_PROGRESS_FOR_UPDATE: f64 = 1.0;

/// Windowed velocity estimator with a decaying-trust blend.
#[derive(Debug)]
pub struct ProgressTracker {
    window: VecDeque<ProgressSample>,
    window_size: usize,
    current_estimate: f64,
    adaptation_rate: f64,
    historical_weight: f64,
    min_historical_weight: f64,
}

impl ProgressTracker {
    /// `initial_estimate` seeds the blend: the historical average when the
    /// task has history, otherwise the realized target duration.
    pub fn new(initial_estimate: f64, cfg: &EstimatorConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(cfg.window_size),
            window_size: cfg.window_size.max(1),
            current_estimate: initial_estimate,
            adaptation_rate: cfg.adaptation_rate,
            historical_weight: cfg.historical_weight,
            min_historical_weight: cfg.min_historical_weight,
        }
    }

    /// Append one observation, evicting the oldest when the window is full.
    pub fn add_sample(&mut self, progress: f64, elapsed_secs: f64) {
        self.window.push_back(ProgressSample { progress, elapsed_secs });
        if self.window.len() > self.window_size {
            self.window.pop_front();
        }
    }

    /// Progress units per second over the sample window: the mean of
    /// consecutive pairwise rates, skipping pairs with non-positive time
    /// deltas (duplicate or non-monotonic timestamps). Returns the neutral
    /// 1.0 when fewer than two samples are held or every pair was skipped.
    pub fn velocity(&self) -> f64 {
        if self.window.len() < 2 {
            return NEUTRAL_VELOCITY;
        }

        let mut rate_sum = 0.0;
        let mut pairs = 0usize;
        for (prev, next) in self.window.iter().zip(self.window.iter().skip(1)) {
            let dt = next.elapsed_secs - prev.elapsed_secs;
            if dt > 0.0 {
                rate_sum += (next.progress - prev.progress) / dt;
                pairs += 1;
            }
        }

        if pairs == 0 {
            return NEUTRAL_VELOCITY;
        }
        rate_sum / pairs as f64
    }

    /// Revise the duration estimate from the current position.
    ///
    /// No-op (returns the estimate unchanged) below 1% progress or while the
    /// window velocity is non-positive. Otherwise extrapolates a candidate
    /// total duration from the live velocity, blends it with the current
    /// estimate under the historical weight, and decays that weight toward
    /// its floor so later updates trust live data more.
    pub fn update_estimate(&mut self, progress: f64, elapsed_secs: f64) -> f64 {
        if progress < MIN_PROGRESS_FOR_UPDATE {
            return self.current_estimate;
        }

        let velocity = self.velocity();
        if velocity <= 0.0 {
            return self.current_estimate;
        }

        let remaining_secs = (100.0 - progress) / velocity;
        let candidate = elapsed_secs + remaining_secs;

        self.current_estimate =
            self.current_estimate * self.historical_weight + candidate * (1.0 - self.historical_weight);
        self.historical_weight =
            (self.historical_weight - self.adaptation_rate).max(self.min_historical_weight);

        self.current_estimate
    }

    /// Latest blended duration estimate in seconds.
    pub fn current_estimate(&self) -> f64 {
        self.current_estimate
    }

    /// Current blend weight on the historical/initial estimate.
    pub fn historical_weight(&self) -> f64 {
        self.historical_weight
    }
}
