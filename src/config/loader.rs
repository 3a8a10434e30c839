use super::{BenchConfig, DEFAULT_CONFIG_FILE};
use crate::error::{CutbenchError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolves a [`BenchConfig`] from defaults, an optional TOML file and
/// `CUTBENCH_*` environment variables, in increasing precedence.
pub struct ConfigLoader {
    search_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
        }
    }

    /// Loader that looks for `cutbench.toml` in the current directory
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| CutbenchError::io(".", e))?;
        Ok(Self::new(cwd))
    }

    /// An explicit path must exist; without one, `cutbench.toml` in the
    /// search directory is used if present.
    pub async fn load(&self, explicit: Option<&Path>) -> Result<BenchConfig> {
        let mut config = match explicit {
            Some(path) => Self::load_file(path).await?,
            None => {
                let candidate = self.search_dir.join(DEFAULT_CONFIG_FILE);
                if fs::try_exists(&candidate).await.unwrap_or(false) {
                    Self::load_file(&candidate).await?
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    BenchConfig::default()
                }
            }
        };

        config.merge_env_vars();
        Ok(config)
    }

    pub async fn load_file(path: &Path) -> Result<BenchConfig> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CutbenchError::io(path, e))?;
        let config = Self::parse(&content).map_err(|source| CutbenchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<BenchConfig, toml::de::Error> {
        toml::from_str(content)
    }
}
