//! Task-duration history: the only state shared across runs.
//!
//! The store is a cloneable handle; all clones share one map guarded by a
//! mutex, so concurrent runs recording the same task name serialize their
//! writes. Durations persist as a JSON snapshot under the XDG state dir,
//! written after every recorded duration.

mod persist;

pub use persist::default_history_path;

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Summary of one task's recorded history (for status listings).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub task_name: String,
    pub runs: usize,
    pub average_secs: f64,
}

struct StoreInner {
    durations: BTreeMap<String, Vec<f64>>,
    /// Snapshot path; None = in-memory store (tests), nothing persisted.
    path: Option<PathBuf>,
}

/// Cloneable handle to the shared task-duration history.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl HistoryStore {
    /// In-memory store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                durations: BTreeMap::new(),
                path: None,
            })),
        }
    }

    /// Open the default store under the XDG state dir, loading any existing snapshot.
    pub fn open_default() -> Result<Self> {
        Self::open(default_history_path()?)
    }

    /// Open a store backed by the given snapshot path. A missing file is an
    /// empty store; the file is created on the first recorded duration.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let durations = persist::load_from_path(&path)?.unwrap_or_default();
        Ok(Self {
            inner: Arc::new(Mutex::new(StoreInner {
                durations,
                path: Some(path),
            })),
        })
    }

    /// Whether any durations are recorded for this task.
    pub fn has_history(&self, task_name: &str) -> bool {
        self.inner.lock().unwrap().durations.contains_key(task_name)
    }

    /// Mean of all recorded durations for this task. Returns 0.0 when the
    /// task has no history; callers should check [`has_history`](Self::has_history) first.
    pub fn average_duration(&self, task_name: &str) -> f64 {
        let inner = self.inner.lock().unwrap();
        match inner.durations.get(task_name) {
            Some(ds) if !ds.is_empty() => ds.iter().sum::<f64>() / ds.len() as f64,
            _ => 0.0,
        }
    }

    /// Append one observed duration and persist the snapshot.
    pub fn record_duration(&self, task_name: &str, duration_secs: f64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .durations
            .entry(task_name.to_string())
            .or_default()
            .push(duration_secs);
        tracing::debug!(task = task_name, duration_secs, "recorded duration");
        persist_locked(&inner)
    }

    /// All tasks with recorded history, sorted by name.
    pub fn tasks(&self) -> Vec<TaskSummary> {
        let inner = self.inner.lock().unwrap();
        inner
            .durations
            .iter()
            .map(|(name, ds)| TaskSummary {
                task_name: name.clone(),
                runs: ds.len(),
                average_secs: if ds.is_empty() {
                    0.0
                } else {
                    ds.iter().sum::<f64>() / ds.len() as f64
                },
            })
            .collect()
    }

    /// Drop a task's history and persist. Returns true if the task existed.
    pub fn remove(&self, task_name: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.durations.remove(task_name).is_some();
        if existed {
            persist_locked(&inner)?;
        }
        Ok(existed)
    }
}

fn persist_locked(inner: &StoreInner) -> Result<()> {
    match &inner.path {
        Some(path) => persist::save_to_path(&inner.durations, path),
        None => Ok(()),
    }
}
