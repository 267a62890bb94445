use chunkvault_core::{ChunkvaultError, ChunkvaultResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of results returned by a search when `top_k` is not configured.
pub const DEFAULT_TOP_K: usize = 4;

/// Name of the backing file inside the store directory.
pub const STORE_FILE_NAME: &str = "chunkvault.store";

/// Construction parameters for a [`FileVectorStore`](crate::FileVectorStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the backing file. It must exist and be writable
    /// for documents to be added.
    pub directory: PathBuf,
    /// Maximum number of documents a search returns.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl StoreConfig {
    /// Config for `directory` with the default `top_k`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set `top_k`. Chainable builder method.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Rejects a zero `top_k`.
    pub fn validate(&self) -> ChunkvaultResult<()> {
        if self.top_k == 0 {
            return Err(ChunkvaultError::Config(
                "top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the backing file.
    pub fn store_path(&self) -> PathBuf {
        self.directory.join(STORE_FILE_NAME)
    }
}
