use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::demux::{PRIMARY_FILE, SECONDARY_FILE, SENTINEL};
use crate::error::{CutbenchError, Result};

pub mod loader;

#[cfg(test)]
mod tests;

pub use loader::ConfigLoader;

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cutbench.toml";

/// Circuit families benchmarked by the experiment
pub const DEFAULT_CIRCUIT_TYPES: &[&str] = &[
    "supremacy",
    "approximate_qft",
    "regular",
    "erdos",
    "hwea",
    "bv",
    "adder",
];

/// What to do when the experiment program exits unsuccessfully
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log a warning, record the failure and keep going
    #[default]
    Continue,
    /// Stop the batch at the first failed invocation
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Experiment program and its leading arguments, shell-quoted
    pub command: String,
    pub circuit_types: Vec<String>,
    pub circuit_sizes: Vec<u32>,
    /// Invocations per run configuration
    pub iterations: u32,
    pub output_root: PathBuf,
    pub working_dir: Option<PathBuf>,
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub on_failure: FailurePolicy,
    pub sentinel: String,
    pub primary_file: String,
    pub secondary_file: String,
    pub figs_dir: String,
    pub summary_path: Option<PathBuf>,
    pub env: HashMap<String, String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            command: "python full_cut_mlft.py".to_string(),
            circuit_types: DEFAULT_CIRCUIT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            circuit_sizes: vec![12],
            iterations: 2,
            output_root: PathBuf::from("results"),
            working_dir: None,
            timeout: None,
            on_failure: FailurePolicy::Continue,
            sentinel: SENTINEL.to_string(),
            primary_file: PRIMARY_FILE.to_string(),
            secondary_file: SECONDARY_FILE.to_string(),
            figs_dir: "figs".to_string(),
            summary_path: None,
            env: HashMap::new(),
        }
    }
}

impl BenchConfig {
    pub fn merge_env_vars(&mut self) {
        if let Ok(command) = std::env::var("CUTBENCH_COMMAND") {
            self.command = command;
        }

        if let Ok(root) = std::env::var("CUTBENCH_OUTPUT_ROOT") {
            self.output_root = PathBuf::from(root);
        }

        if let Ok(iterations) = std::env::var("CUTBENCH_ITERATIONS") {
            match iterations.parse::<u32>() {
                Ok(value) => self.iterations = value,
                Err(_) => tracing::warn!(
                    "Ignoring CUTBENCH_ITERATIONS={}: not a non-negative integer",
                    iterations
                ),
            }
        }

        if let Ok(timeout) = std::env::var("CUTBENCH_TIMEOUT") {
            match humantime_serde::re::humantime::parse_duration(&timeout) {
                Ok(value) => self.timeout = Some(value),
                Err(e) => tracing::warn!("Ignoring CUTBENCH_TIMEOUT={}: {}", timeout, e),
            }
        }
    }

    /// Split `command` into program and leading arguments
    pub fn command_parts(&self) -> Result<(String, Vec<String>)> {
        let mut parts = shell_words::split(&self.command)
            .map_err(|e| CutbenchError::config(format!("invalid command '{}': {}", self.command, e)))?;
        if parts.is_empty() {
            return Err(CutbenchError::config("command must not be empty"));
        }
        let program = parts.remove(0);
        Ok((program, parts))
    }

    pub fn validate(&self) -> Result<()> {
        self.command_parts()?;

        if self.circuit_types.is_empty() {
            return Err(CutbenchError::config("at least one circuit type is required"));
        }
        for circuit_type in &self.circuit_types {
            if circuit_type.is_empty()
                || circuit_type.contains(std::path::is_separator)
                || circuit_type == "."
                || circuit_type == ".."
            {
                return Err(CutbenchError::config(format!(
                    "invalid circuit type '{}'",
                    circuit_type
                )));
            }
        }

        if self.circuit_sizes.is_empty() {
            return Err(CutbenchError::config("at least one circuit size is required"));
        }
        if self.circuit_sizes.contains(&0) {
            return Err(CutbenchError::config("circuit sizes must be positive"));
        }

        if self.iterations == 0 {
            return Err(CutbenchError::config("iterations must be at least 1"));
        }

        if self.sentinel.is_empty() {
            return Err(CutbenchError::config("sentinel must not be empty"));
        }

        for (name, value) in [
            ("primary_file", &self.primary_file),
            ("secondary_file", &self.secondary_file),
            ("figs_dir", &self.figs_dir),
        ] {
            if value.is_empty() || value.contains(std::path::is_separator) {
                return Err(CutbenchError::config(format!(
                    "{} must be a plain file name, got '{}'",
                    name, value
                )));
            }
        }
        if self.primary_file == self.secondary_file {
            return Err(CutbenchError::config(
                "primary_file and secondary_file must differ",
            ));
        }

        Ok(())
    }
}
