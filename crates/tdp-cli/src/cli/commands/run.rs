//! `tdp run <name>` – simulate a task and render live progress to the console.

use anyhow::Result;
use std::io::Write;

use tdp_core::config::TdpConfig;
use tdp_core::control::CancelToken;
use tdp_core::history::HistoryStore;
use tdp_core::simulate::{simulate, RunOutcome, SimulationHandlers};

/// Runs the simulation `runs` times in a row. Ctrl-C cancels the in-flight
/// run via the shared token; a cancelled run records nothing and stops the
/// remaining iterations.
pub async fn run_simulate(store: &HistoryStore, cfg: &TdpConfig, name: &str, runs: usize) -> Result<()> {
    let total = runs.max(1);
    for attempt in 1..=total {
        if total > 1 {
            println!("run {attempt}/{total}: {name}");
        }

        let cancel = CancelToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let handlers = SimulationHandlers::new()
            .on_average_announced(|avg| {
                println!("historical data found, average duration {avg:.2}s");
            })
            .on_progress(|progress, remaining| {
                match remaining {
                    Some(r) => print!("\rprogress {progress:5.1}% - estimated remaining {r:6.2}s   "),
                    None => print!("\rprogress {progress:5.1}%   "),
                }
                let _ = std::io::stdout().flush();
            })
            .on_completed(|actual| {
                println!("\ndone in {actual:.2}s (recorded to history)");
            });

        let outcome = simulate(store, cfg, name, handlers, cancel).await?;
        ctrl_c.abort();

        if outcome == RunOutcome::Cancelled {
            println!("\nsimulation cancelled");
            return Ok(());
        }
    }
    Ok(())
}
