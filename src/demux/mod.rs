//! Sentinel-based splitting of a line stream into two append-only sinks
//!
//! The producer (the experiment program) prints its CutQC output first, then
//! a single marker line, then its MLFT output. Everything before the first
//! marker goes to the primary sink, everything after it to the secondary
//! sink. The marker line that causes the switch is never written.

pub mod error;
pub mod router;
pub mod sink;
pub mod splitter;


pub use error::DemuxError;
pub use router::{Route, SentinelRouter};
pub use sink::{SinkPair, SinkPaths};
pub use splitter::{demultiplex, demultiplex_with, DemuxStats};

/// Marker line separating the CutQC and MLFT sections of the output
pub const SENTINEL: &str = "Start MLFT";

/// File receiving lines printed before the sentinel
pub const PRIMARY_FILE: &str = "cutqc.txt";

/// File receiving lines printed after the sentinel
pub const SECONDARY_FILE: &str = "mlft.txt";
