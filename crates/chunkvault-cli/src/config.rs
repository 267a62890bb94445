use anyhow::Context;
use chunkvault_memory::{StoreConfig, DEFAULT_TOP_K};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "chunkvault.toml";

#[derive(Debug, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            top_k: default_top_k(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data")
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl CliConfig {
    /// Load `explicit` if given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise defaults.
    pub async fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        };
        Self::parse(&text).with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Command-line overrides win over the file.
    pub fn store_config(self, directory: Option<PathBuf>, top_k: Option<usize>) -> StoreConfig {
        StoreConfig::new(directory.unwrap_or(self.store.directory))
            .with_top_k(top_k.unwrap_or(self.store.top_k))
    }
}
