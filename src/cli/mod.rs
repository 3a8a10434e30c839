//! Command-line interface
//!
//! Argument definitions live in [`args`]; each subcommand has a handler in
//! [`commands`].

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, PlanArgs, RunArgs, SelectionArgs, SplitArgs};

/// Dispatch a parsed command line to its handler
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => commands::run_batch(args).await,
        Commands::Plan(args) => commands::show_plan(args).await,
        Commands::Split(args) => commands::split_stdin(args).await,
    }
}
