pub mod config;
pub mod logging;

pub mod control;
pub mod error;
pub mod history;
pub mod params;
pub mod simulate;
pub mod tracker;
