//! Startup configuration
//!
//! The encryption passphrase is injected here by the embedding application;
//! it is never a constant in this crate.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{CoreError, Result};

/// Configuration for opening the core
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory for the store and salt files; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Passphrase the storage key is derived from
    pub passphrase: String,
}

impl CoreConfig {
    /// Create a config with the default data directory
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            data_dir: None,
            passphrase: passphrase.into(),
        }
    }

    /// Override the data directory (used by tests)
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = Some(data_dir);
        self
    }

    /// Resolve the effective data directory
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        ProjectDirs::from("com", "studypro-global", "studypro")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CoreError::StorageError("Could not determine data directory".to_string())
            })
    }
}
