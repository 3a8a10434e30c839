use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::BenchConfig;

/// One circuit type and size, with the folder its results land in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfiguration {
    pub circuit_type: String,
    pub circuit_size: u32,
    pub output_folder: PathBuf,
}

impl RunConfiguration {
    pub fn new(circuit_type: &str, circuit_size: u32, output_root: &Path) -> Self {
        Self {
            circuit_type: circuit_type.to_string(),
            circuit_size,
            output_folder: output_root.join(format!("{}_{}", circuit_type, circuit_size)),
        }
    }

    pub fn label(&self) -> String {
        format!("{}_{}", self.circuit_type, self.circuit_size)
    }

    /// The three trailing arguments handed to the experiment program
    pub fn positional_args(&self) -> [String; 3] {
        [
            self.circuit_type.clone(),
            self.circuit_size.to_string(),
            self.output_folder.to_string_lossy().into_owned(),
        ]
    }
}

/// Ordered list of run configurations: every size of the first type, then
/// every size of the next type, and so on.
#[derive(Debug, Clone, Serialize)]
pub struct BatchPlan {
    runs: Vec<RunConfiguration>,
    iterations: u32,
}

impl BatchPlan {
    pub fn from_config(config: &BenchConfig) -> Self {
        let runs = config
            .circuit_types
            .iter()
            .flat_map(|circuit_type| {
                config.circuit_sizes.iter().map(move |&size| {
                    RunConfiguration::new(circuit_type, size, &config.output_root)
                })
            })
            .collect();

        Self {
            runs,
            iterations: config.iterations,
        }
    }

    pub fn runs(&self) -> &[RunConfiguration] {
        &self.runs
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn total_invocations(&self) -> usize {
        self.runs.len() * self.iterations as usize
    }
}
