//! CLI for the tdp task-duration prediction simulator.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tdp_core::config;
use tdp_core::history::HistoryStore;

use commands::{run_remove, run_simulate, run_status};

/// Top-level CLI for the tdp simulator.
#[derive(Debug, Parser)]
#[command(name = "tdp")]
#[command(about = "tdp: adaptive task-duration prediction simulator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Simulate a named task, printing live progress and a refined ETA.
    Run {
        /// Task name; history accumulates under this key.
        name: String,
        /// Run the simulation N times in a row (each run sharpens the history).
        #[arg(long, default_value = "1", value_name = "N")]
        runs: usize,
    },

    /// Show recorded task histories and their average durations.
    Status,

    /// Forget a task's recorded history.
    Remove {
        /// Task name to forget.
        name: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let store = HistoryStore::open_default()?;

        match cli.command {
            CliCommand::Run { name, runs } => run_simulate(&store, &cfg, &name, runs).await?,
            CliCommand::Status => run_status(&store)?,
            CliCommand::Remove { name } => run_remove(&store, &name)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
