//! Sequential experiment batches
//!
//! A batch walks the circuit type x size grid, runs the experiment program
//! a fixed number of times per cell and splits each run's stdout into the
//! cell's CutQC and MLFT accumulation files.

pub mod executor;
pub mod layout;
pub mod plan;
pub mod summary;


pub use executor::BatchExecutor;
pub use layout::{prepare_output_folder, OutputLayout};
pub use plan::{BatchPlan, RunConfiguration};
pub use summary::{BatchSummary, IterationRecord, RunRecord};

/// Printed once every run configuration has been processed
pub const COMPLETION_MESSAGE: &str = "All experiments finished.";
