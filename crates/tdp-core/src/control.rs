//! Cooperative cancellation for simulation runs.
//!
//! Each `simulate()` invocation takes a `CancelToken`; both pipeline stages
//! check it and wind down within one tick of it being set. Clone the token
//! and call `cancel()` from anywhere (e.g. a Ctrl-C handler) to stop the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared by the producer and consumer stages.
///
/// A fresh token is not cancelled; cancellation is one-way and permanent for
/// the run that observes it. Callers start a new run to retry.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The producer stops emitting within one tick and
    /// the run settles as `RunOutcome::Cancelled`; nothing is written to history.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once `cancel()` was called on any clone of this token.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        assert!(!other.is_cancelled());

        other.cancel();
        assert!(token.is_cancelled());
        assert!(other.is_cancelled());
    }
}
