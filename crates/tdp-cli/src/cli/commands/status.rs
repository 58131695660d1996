//! `tdp status` – list recorded task histories.

use anyhow::Result;
use tdp_core::history::HistoryStore;

pub fn run_status(store: &HistoryStore) -> Result<()> {
    let tasks = store.tasks();
    if tasks.is_empty() {
        println!("No task history recorded yet.");
    } else {
        println!("{:<32} {:>6} {:>12}", "TASK", "RUNS", "AVG (s)");
        for t in tasks {
            println!("{:<32} {:>6} {:>12.2}", t.task_name, t.runs, t.average_secs);
        }
    }
    Ok(())
}
