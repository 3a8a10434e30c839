pub mod plan;
pub mod run;
pub mod split;

pub use plan::show_plan;
pub use run::run_batch;
pub use split::split_stdin;

use anyhow::{Context, Result};

use super::args::SelectionArgs;
use crate::config::{BenchConfig, ConfigLoader};

/// Load the configuration and apply the selection overrides on top.
///
/// Validation is left to the caller, which may apply further overrides.
pub(crate) async fn load_config(selection: &SelectionArgs) -> Result<BenchConfig> {
    let loader = ConfigLoader::from_current_dir()?;
    let mut config = loader
        .load(selection.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    apply_selection(&mut config, selection);
    Ok(config)
}

pub(crate) fn apply_selection(config: &mut BenchConfig, selection: &SelectionArgs) {
    if !selection.circuit_types.is_empty() {
        config.circuit_types = selection.circuit_types.clone();
    }
    if !selection.circuit_sizes.is_empty() {
        config.circuit_sizes = selection.circuit_sizes.clone();
    }
    if let Some(iterations) = selection.iterations {
        config.iterations = iterations;
    }
    if let Some(root) = &selection.output_root {
        config.output_root = root.clone();
    }
}
