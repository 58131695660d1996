//! Per-run duration parameters: prediction mode and the realized target.
//!
//! Resolved once at the start of the producer stage and immutable for the
//! rest of the run. Pure computation apart from reading the history store.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::RandomnessConfig;
use crate::history::HistoryStore;

/// Smallest target duration a degenerate draw can produce, in seconds.
const MIN_TARGET_SECS: f64 = 0.1;

/// Extra multiplicative variation on the no-history path (±30%).
const COLD_VARIATION: f64 = 0.6;

/// Parameters fixed at the start of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Duration this run will take on the simulated clock. Always positive.
    pub target_secs: f64,
    /// Mean of the task's recorded durations (0.0 when `use_prediction` is false).
    pub historical_avg: f64,
    /// Whether the task has history to announce and seed the estimator with.
    pub use_prediction: bool,
}

/// Resolve run parameters for `task_name` using the thread RNG.
pub fn resolve(store: &HistoryStore, cfg: &RandomnessConfig, task_name: &str) -> SimulationParams {
    resolve_with_rng(store, cfg, task_name, &mut rand::thread_rng())
}

/// Same as [`resolve`], with an injected RNG for deterministic tests.
///
/// With history: `target = avg * U(min_factor, max_factor) * (1 + jitter * dampening)`
/// where jitter is a standard normal truncated to ±2σ. Without history:
/// `target = U(min_base, max_base) * (1 ± 30%)` to emulate unpredictable
/// first-time work. The target is clamped positive in both paths.
pub fn resolve_with_rng<R: Rng>(
    store: &HistoryStore,
    cfg: &RandomnessConfig,
    task_name: &str,
    rng: &mut R,
) -> SimulationParams {
    let use_prediction = store.has_history(task_name);

    let (target_secs, historical_avg) = if use_prediction {
        let avg = store.average_duration(task_name);
        let factor = rng.gen_range(cfg.min_factor..cfg.max_factor);
        let jitter = truncated_normal(rng);
        (avg * factor * (1.0 + jitter * cfg.jitter_dampening), avg)
    } else {
        let base = rng.gen_range(cfg.min_base_secs..cfg.max_base_secs);
        let variation = 1.0 + (rng.gen::<f64>() - 0.5) * COLD_VARIATION;
        (base * variation, 0.0)
    };

    SimulationParams {
        target_secs: target_secs.max(MIN_TARGET_SECS),
        historical_avg,
        use_prediction,
    }
}

/// Standard normal draw truncated to [-2, 2] standard deviations.
fn truncated_normal<R: Rng>(rng: &mut R) -> f64 {
    let draw: f64 = rng.sample(StandardNormal);
    draw.clamp(-2.0, 2.0)
}
