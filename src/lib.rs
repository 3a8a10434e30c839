//! # cutbench
//!
//! Batch driver for circuit-cutting experiments. Runs an external experiment
//! program over a grid of circuit types and sizes and splits each run's
//! stdout into CutQC and MLFT accumulation files at the `Start MLFT` marker.
//!
//! ## Usage
//!
//! ```bash
//! cutbench run [-c cutbench.toml] [-t TYPE]... [-s SIZE]... [-n ITERATIONS]
//! cutbench plan [--json]
//! some-program | cutbench split --primary cutqc.txt --secondary mlft.txt
//! ```
//!
//! ## Modules
//!
//! - `batch` - Run configuration grid, output layout and sequential execution
//! - `cli` - Command-line argument definitions and subcommand handlers
//! - `config` - Batch configuration, TOML loading and environment overrides
//! - `demux` - Sentinel-based splitting of line streams into two sinks
//! - `error` - Crate-wide error type
//! - `subprocess` - Process abstraction with a tokio runner and a scripted mock
pub mod batch;
pub mod cli;
pub mod config;
pub mod demux;
pub mod error;
pub mod subprocess;

pub use error::{CutbenchError, Result};
