use std::path::{Path, PathBuf};

use crate::config::BenchConfig;
use crate::demux::SinkPaths;
use crate::error::{CutbenchError, Result};

/// File and directory names inside each run's output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub primary_file: String,
    pub secondary_file: String,
    pub figs_dir: String,
}

impl OutputLayout {
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            primary_file: config.primary_file.clone(),
            secondary_file: config.secondary_file.clone(),
            figs_dir: config.figs_dir.clone(),
        }
    }

    pub fn sink_paths(&self, folder: &Path) -> SinkPaths {
        SinkPaths::in_folder(folder, &self.primary_file, &self.secondary_file)
    }

    pub fn figs_path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.figs_dir)
    }
}

/// Create the output folder and its figures directory.
///
/// Directories that already exist are fine, so a batch can be re-run
/// against the same output root.
pub async fn prepare_output_folder(folder: &Path, layout: &OutputLayout) -> Result<()> {
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| CutbenchError::io(folder, e))?;

    let figs = layout.figs_path(folder);
    tokio::fs::create_dir_all(&figs)
        .await
        .map_err(|e| CutbenchError::io(&figs, e))?;

    tracing::trace!("Prepared output folder {}", folder.display());
    Ok(())
}
