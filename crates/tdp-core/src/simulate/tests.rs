//! Pipeline behavior tests: event ordering, terminal exclusivity, cancellation.
//!
//! These run under a paused tokio clock so the per-tick sleeps resolve
//! instantly and the tests stay deterministic in wall time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::TdpConfig;
use crate::control::CancelToken;
use crate::error::SimulateError;
use crate::history::HistoryStore;

use super::{simulate, RunOutcome, SimulationHandlers};

/// What the callbacks observed, in invocation order.
#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Average(f64),
    Progress(f64, Option<f64>),
    Completed(f64),
}

fn recording_handlers(log: &Arc<Mutex<Vec<Seen>>>) -> SimulationHandlers {
    let avg_log = Arc::clone(log);
    let progress_log = Arc::clone(log);
    let done_log = Arc::clone(log);
    SimulationHandlers::new()
        .on_average_announced(move |avg| avg_log.lock().unwrap().push(Seen::Average(avg)))
        .on_progress(move |p, rem| progress_log.lock().unwrap().push(Seen::Progress(p, rem)))
        .on_completed(move |d| done_log.lock().unwrap().push(Seen::Completed(d)))
}

fn test_config() -> TdpConfig {
    let mut cfg = TdpConfig::default();
    cfg.tick_millis = 5;
    cfg.queue_capacity = 4;
    cfg.randomness.min_base_secs = 0.2;
    cfg.randomness.max_base_secs = 0.5;
    cfg
}

fn progress_values(log: &[Seen]) -> Vec<f64> {
    log.iter()
        .filter_map(|s| match s {
            Seen::Progress(p, _) => Some(*p),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn cold_run_completes_and_records_history() {
    let store = HistoryStore::in_memory();
    let cfg = test_config();
    let log = Arc::new(Mutex::new(Vec::new()));

    let outcome = simulate(&store, &cfg, "Deploy", recording_handlers(&log), CancelToken::new())
        .await
        .unwrap();

    let actual = match outcome {
        RunOutcome::Completed { actual_secs } => actual_secs,
        RunOutcome::Cancelled => panic!("run should complete"),
    };
    assert!(actual > 0.0);

    let log = log.lock().unwrap();
    // No history: no announcement, and every remaining estimate is absent.
    assert!(!log.iter().any(|s| matches!(s, Seen::Average(_))));
    for seen in log.iter() {
        if let Seen::Progress(_, remaining) = seen {
            assert_eq!(*remaining, None);
        }
    }
    // Exactly one Completed, and it is the last delivery.
    let completed: Vec<_> = log.iter().filter(|s| matches!(s, Seen::Completed(_))).collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(log.last(), Some(&Seen::Completed(actual)));

    assert!(store.has_history("Deploy"));
    assert_eq!(store.average_duration("Deploy"), actual);
}

#[tokio::test(start_paused = true)]
async fn progress_is_monotonic_and_bounded() {
    let store = HistoryStore::in_memory();
    let cfg = test_config();
    let log = Arc::new(Mutex::new(Vec::new()));

    simulate(&store, &cfg, "Deploy", recording_handlers(&log), CancelToken::new())
        .await
        .unwrap();

    let values = progress_values(&log.lock().unwrap());
    assert!(!values.is_empty());
    let mut prev = 0.0;
    for p in values {
        assert!((0.0..=100.0).contains(&p));
        assert!(p >= prev, "progress must never decrease");
        prev = p;
    }
    assert_eq!(prev, 100.0);
}

#[tokio::test(start_paused = true)]
async fn history_run_announces_average_before_progress() {
    let store = HistoryStore::in_memory();
    store.record_duration("Build", 20.0).unwrap();
    let cfg = test_config();
    let log = Arc::new(Mutex::new(Vec::new()));

    let outcome = simulate(&store, &cfg, "Build", recording_handlers(&log), CancelToken::new())
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { actual_secs } if actual_secs > 0.0));

    let log = log.lock().unwrap();
    assert_eq!(log.first(), Some(&Seen::Average(20.0)));
    let announcements = log.iter().filter(|s| matches!(s, Seen::Average(_))).count();
    assert_eq!(announcements, 1);
    assert!(matches!(log.last(), Some(Seen::Completed(_))));

    // Prediction mode: every delivered estimate is present and non-negative.
    for seen in log.iter() {
        if let Seen::Progress(_, remaining) = seen {
            let r = remaining.expect("prediction runs always carry an estimate");
            assert!(r >= 0.0);
        }
    }

    // The completed run folded into the existing history.
    assert_eq!(store.tasks()[0].runs, 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_start_emits_no_callbacks_and_writes_nothing() {
    let store = HistoryStore::in_memory();
    let cfg = test_config();
    let log = Arc::new(Mutex::new(Vec::new()));

    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = simulate(&store, &cfg, "Deploy", recording_handlers(&log), cancel)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(log.lock().unwrap().is_empty());
    assert!(!store.has_history("Deploy"));
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_stops_without_recording() {
    let store = HistoryStore::in_memory();
    let mut cfg = test_config();
    // Long enough that the run cannot finish before the cancel lands.
    cfg.randomness.min_base_secs = 500.0;
    cfg.randomness.max_base_secs = 600.0;
    let log = Arc::new(Mutex::new(Vec::new()));

    let cancel = CancelToken::new();
    let canceller = {
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            cancel.cancel();
        }
    };
    let (outcome, ()) = tokio::join!(
        simulate(&store, &cfg, "Migrate", recording_handlers(&log), cancel),
        canceller
    );

    assert_eq!(outcome.unwrap(), RunOutcome::Cancelled);
    let log = log.lock().unwrap();
    assert!(!log.iter().any(|s| matches!(s, Seen::Completed(_))));
    assert!(!store.has_history("Migrate"));
}

#[tokio::test(start_paused = true)]
async fn empty_task_name_is_rejected_before_any_work() {
    let store = HistoryStore::in_memory();
    let cfg = test_config();
    let log = Arc::new(Mutex::new(Vec::new()));

    let err = simulate(&store, &cfg, "", recording_handlers(&log), CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SimulateError::InvalidTaskName));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn repeated_runs_accumulate_history() {
    let store = HistoryStore::in_memory();
    let cfg = test_config();

    for _ in 0..3 {
        let outcome = simulate(&store, &cfg, "Package", SimulationHandlers::new(), CancelToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
    }

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_name, "Package");
    assert_eq!(tasks[0].runs, 3);
    assert!(tasks[0].average_secs > 0.0);
}
