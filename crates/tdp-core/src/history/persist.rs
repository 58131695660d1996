//! JSON snapshot persistence for the history store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub(super) const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the history store.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct HistorySnapshot {
    pub version: u32,
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct TaskRecord {
    pub task_name: String,
    pub durations: Vec<f64>,
}

/// Default path for the history snapshot: `~/.local/state/tdp/history.json`.
pub fn default_history_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tdp")?;
    Ok(xdg_dirs.get_state_home().join("history.json"))
}

/// Save the duration map to the given path (creates parent dir if needed).
pub(super) fn save_to_path(durations: &BTreeMap<String, Vec<f64>>, path: &Path) -> Result<()> {
    let snapshot = HistorySnapshot {
        version: SNAPSHOT_VERSION,
        tasks: durations
            .iter()
            .map(|(name, ds)| TaskRecord {
                task_name: name.clone(),
                durations: ds.clone(),
            })
            .collect(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&snapshot).context("serialize task history")?;
    std::fs::write(path, json).with_context(|| format!("write task history: {}", path.display()))?;
    Ok(())
}

/// Load the duration map from the given path. A missing file returns None so
/// the caller can start with an empty store.
pub(super) fn load_from_path(path: &Path) -> Result<Option<BTreeMap<String, Vec<f64>>>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read task history: {}", path.display())),
    };
    let snapshot: HistorySnapshot = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse task history: {}", path.display()))?;
    Ok(Some(
        snapshot
            .tasks
            .into_iter()
            .map(|t| (t.task_name, t.durations))
            .collect(),
    ))
}
