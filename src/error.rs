use std::path::PathBuf;
use thiserror::Error;

use crate::demux::DemuxError;
use crate::subprocess::ProcessError;

#[derive(Error, Debug)]
pub enum CutbenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration file {}: {}", .path.display(), .source)]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Demux(#[from] DemuxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch aborted: {0}")]
    Aborted(String),
}

impl CutbenchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CutbenchError>;
