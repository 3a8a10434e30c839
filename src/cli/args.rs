//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::demux::SENTINEL;

/// Run circuit-cutting experiments and split their CutQC/MLFT output
#[derive(Parser)]
#[command(name = "cutbench")]
#[command(about = "cutbench - Run circuit-cutting experiments and split CutQC/MLFT output", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the experiment program over every circuit type and size
    #[command(name = "run")]
    Run(RunArgs),

    /// Show the run configurations without executing anything
    #[command(name = "plan")]
    Plan(PlanArgs),

    /// Split standard input into two files at the sentinel line
    #[command(name = "split")]
    Split(SplitArgs),
}

/// Options shared by `run` and `plan` that shape the batch
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Path to a TOML configuration file (defaults to ./cutbench.toml if present)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Circuit type to run (repeatable; replaces the configured set)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub circuit_types: Vec<String>,

    /// Circuit size to run (repeatable; replaces the configured set)
    #[arg(short = 's', long = "size", value_name = "SIZE")]
    pub circuit_sizes: Vec<u32>,

    /// Invocations per circuit type and size
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Directory that receives one folder per circuit type and size
    #[arg(short = 'o', long)]
    pub output_root: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Experiment program and leading arguments (e.g. "python full_cut_mlft.py")
    #[arg(long)]
    pub command: Option<String>,

    /// Kill an invocation that runs longer than this (e.g. "30m")
    #[arg(long, value_parser = humantime_serde::re::humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Stop the batch at the first failed invocation
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a JSON summary of every invocation to this path
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Dry-run mode - show what would be executed without running
    #[arg(long, help = "Preview commands without executing them")]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// File receiving lines before the sentinel (appended to)
    #[arg(long)]
    pub primary: PathBuf,

    /// File receiving lines after the sentinel (appended to)
    #[arg(long)]
    pub secondary: PathBuf,

    /// Line that switches output from the primary to the secondary file
    #[arg(
        long,
        default_value = SENTINEL,
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub sentinel: String,
}
