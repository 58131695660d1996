//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn parse_run_defaults_to_one_run() {
    match parse(&["tdp", "run", "Build"]) {
        CliCommand::Run { name, runs } => {
            assert_eq!(name, "Build");
            assert_eq!(runs, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_run_with_runs_flag() {
    match parse(&["tdp", "run", "Build", "--runs", "5"]) {
        CliCommand::Run { name, runs } => {
            assert_eq!(name, "Build");
            assert_eq!(runs, 5);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_status_and_remove() {
    assert!(matches!(parse(&["tdp", "status"]), CliCommand::Status));
    match parse(&["tdp", "remove", "Deploy"]) {
        CliCommand::Remove { name } => assert_eq!(name, "Deploy"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_rejects_missing_task_name() {
    assert!(Cli::try_parse_from(["tdp", "run"]).is_err());
}
