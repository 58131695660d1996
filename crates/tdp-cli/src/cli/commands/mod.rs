//! CLI command handlers. Each command is in its own file for clarity.

mod remove;
mod run;
mod status;

pub use remove::run_remove;
pub use run::run_simulate;
pub use status::run_status;
