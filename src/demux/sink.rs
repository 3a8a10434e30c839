use futures::stream::Stream;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use super::error::DemuxError;
use super::splitter::{demultiplex_with, DemuxStats};
use crate::error::{CutbenchError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkPaths {
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

impl SinkPaths {
    pub fn new(primary: impl Into<PathBuf>, secondary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn in_folder(folder: &Path, primary_name: &str, secondary_name: &str) -> Self {
        Self::new(folder.join(primary_name), folder.join(secondary_name))
    }
}

/// Two append-mode files that receive demultiplexed output.
///
/// Existing content is never truncated, so repeated passes accumulate.
/// Call [`SinkPair::close`] when done; buffered lines are only guaranteed
/// on disk after a flush or close.
pub struct SinkPair {
    primary: BufWriter<File>,
    secondary: BufWriter<File>,
}

impl SinkPair {
    pub async fn open(paths: SinkPaths) -> Result<Self> {
        let primary = open_append(&paths.primary).await?;
        let secondary = open_append(&paths.secondary).await?;
        tracing::debug!(
            "Opened sinks {} and {}",
            paths.primary.display(),
            paths.secondary.display()
        );

        Ok(Self {
            primary: BufWriter::new(primary),
            secondary: BufWriter::new(secondary),
        })
    }

    /// Route one producer's output into this pair
    pub async fn demux<S, E>(
        &mut self,
        lines: S,
        sentinel: &str,
    ) -> std::result::Result<DemuxStats, DemuxError>
    where
        S: Stream<Item = std::result::Result<String, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        demultiplex_with(lines, sentinel, &mut self.primary, &mut self.secondary).await
    }

    pub async fn flush(&mut self) -> std::result::Result<(), DemuxError> {
        self.primary
            .flush()
            .await
            .map_err(|e| DemuxError::write("primary", e))?;
        self.secondary
            .flush()
            .await
            .map_err(|e| DemuxError::write("secondary", e))
    }

    /// Flush both files and release them
    pub async fn close(mut self) -> std::result::Result<(), DemuxError> {
        let primary = self
            .primary
            .shutdown()
            .await
            .map_err(|e| DemuxError::write("primary", e));
        let secondary = self
            .secondary
            .shutdown()
            .await
            .map_err(|e| DemuxError::write("secondary", e));
        primary.and(secondary)
    }
}

async fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| CutbenchError::io(path, e))
}
