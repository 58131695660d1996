//! `tdp remove <name>` – forget a task's recorded history.

use anyhow::Result;
use tdp_core::history::HistoryStore;

pub fn run_remove(store: &HistoryStore, name: &str) -> Result<()> {
    if store.remove(name)? {
        println!("Removed history for '{name}'");
    } else {
        println!("No history recorded for '{name}'");
    }
    Ok(())
}
