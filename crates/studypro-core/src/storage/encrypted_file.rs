//! Encrypted file storage backend
//!
//! Stores entries in one JSON file in the data directory. Each value is
//! individually encrypted with AES-256-GCM before it reaches disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::SecureStorage;
use crate::crypto::Cipher;
use crate::error::Result;

/// In-memory representation of stored data
#[derive(Debug, Default)]
struct StorageCache {
    /// Map of key -> encrypted value
    entries: HashMap<String, String>,
    /// Whether the cache has been modified since last save
    dirty: bool,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// Encrypted file storage backend
pub struct EncryptedFileStorage {
    /// Directory holding the store file
    storage_dir: PathBuf,
    /// In-memory cache of the encrypted entries
    cache: RwLock<StorageCache>,
    /// Cipher for value encryption
    cipher: Arc<Cipher>,
}

impl EncryptedFileStorage {
    /// Create a storage instance rooted at the given directory
    pub fn with_dir(storage_dir: PathBuf, cipher: Arc<Cipher>) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        debug!("Encrypted file storage initialized at: {:?}", storage_dir);

        Ok(Self {
            storage_dir,
            cache: RwLock::new(StorageCache::default()),
            cipher,
        })
    }

    /// Get the path to the store file
    fn store_file_path(&self) -> PathBuf {
        self.storage_dir.join("store.json")
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    /// Load entries from disk, replacing the in-memory cache
    pub async fn load(&self) -> Result<()> {
        let path = self.store_file_path();

        if !path.exists() {
            debug!("No existing store file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: StorageFile = serde_json::from_str(&contents)?;

        let mut cache = self.cache.write().await;
        cache.entries = file.entries;
        cache.dirty = false;

        debug!("Loaded {} entries from store", cache.entries.len());
        Ok(())
    }

    /// Save entries to disk if anything changed
    async fn save(&self) -> Result<()> {
        let cache = self.cache.read().await;

        if !cache.dirty {
            return Ok(());
        }

        let file = StorageFile {
            version: 1,
            entries: cache.entries.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.store_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} entries to store", cache.entries.len());
        Ok(())
    }
}

#[async_trait]
impl SecureStorage for EncryptedFileStorage {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let encrypted = self.cipher.encrypt(value)?;

        let mut cache = self.cache.write().await;
        cache.entries.insert(key.to_string(), encrypted);
        cache.dirty = true;
        drop(cache);

        self.save().await?;

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let cache = self.cache.read().await;

        match cache.entries.get(key) {
            Some(encrypted) => {
                let decrypted = self.cipher.decrypt(encrypted)?;
                debug!("Retrieved key: {}", key);
                Ok(Some(decrypted))
            }
            None => {
                debug!("Key not found: {}", key);
                Ok(None)
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self.cache.write().await;

        if cache.entries.remove(key).is_some() {
            cache.dirty = true;
            drop(cache);
            self.save().await?;
            debug!("Removed key: {}", key);
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let cache = self.cache.read().await;
        Ok(cache.entries.contains_key(key))
    }

    async fn clear(&self) -> Result<()> {
        let mut cache = self.cache.write().await;
        cache.entries.clear();
        cache.dirty = true;
        drop(cache);

        self.save().await?;
        debug!("Cleared all entries");
        Ok(())
    }
}
