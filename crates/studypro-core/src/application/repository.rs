//! Application repository for CRUD and lifecycle operations
//!
//! The whole application set is one storage entry: a JSON array of
//! individually encrypted record strings. Every write decrypts, rewrites,
//! and re-encrypts the full collection; simple, and fine at the scale of one
//! user's own applications.
//!
//! Writes are read-modify-write without locking across calls, so the
//! repository assumes a single active caller. Concurrent writers race and
//! the last one wins.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{Application, ApplicationStatus, ApplicationUpdate, NewApplication};
use crate::crypto::Cipher;
use crate::error::{CoreError, Result};
use crate::storage::SecureStorage;

/// Storage key holding the full collection
const APPLICATIONS_KEY: &str = "applications";

/// Application repository
pub struct ApplicationRepository {
    /// Storage backend
    storage: Arc<dyn SecureStorage>,
    /// Cipher for per-record encryption and snapshots
    cipher: Arc<Cipher>,
}

impl ApplicationRepository {
    /// Create a new repository over the given storage and cipher
    pub fn new(storage: Arc<dyn SecureStorage>, cipher: Arc<Cipher>) -> Self {
        Self { storage, cipher }
    }

    /// Create a new draft application for a user
    pub async fn create(&self, user_id: Uuid, input: NewApplication) -> Result<Application> {
        let now = Utc::now();
        let mut application = Application {
            id: Uuid::new_v4(),
            user_id,
            personal_info: input.personal_info,
            educational_background: input.educational_background,
            english_proficiency: input.english_proficiency,
            university_preferences: input.university_preferences,
            documents: input.documents,
            status: ApplicationStatus::Draft,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            encrypted_data: None,
        };

        self.refresh_snapshot(&mut application)?;

        let mut collection = self.load_collection().await?;
        collection.push(application.clone());
        self.persist_collection(&collection).await?;

        info!("Created application {} for user {}", application.id, user_id);
        Ok(application)
    }

    /// Apply a shallow patch to an existing application
    ///
    /// Sections present in the patch replace the stored section wholesale;
    /// `updated_at` is bumped and the snapshot refreshed.
    pub async fn update(&self, id: Uuid, patch: ApplicationUpdate) -> Result<Application> {
        let mut collection = self.load_collection().await?;

        let slot = collection
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or(CoreError::ApplicationNotFound(id))?;

        if let Some(personal_info) = patch.personal_info {
            slot.personal_info = personal_info;
        }
        if let Some(educational_background) = patch.educational_background {
            slot.educational_background = educational_background;
        }
        if let Some(english_proficiency) = patch.english_proficiency {
            slot.english_proficiency = english_proficiency;
        }
        if let Some(university_preferences) = patch.university_preferences {
            slot.university_preferences = university_preferences;
        }
        if let Some(documents) = patch.documents {
            slot.documents = documents;
        }
        if let Some(status) = patch.status {
            slot.status = status;
        }
        if let Some(submitted_at) = patch.submitted_at {
            slot.submitted_at = Some(submitted_at);
        }
        slot.updated_at = Utc::now();

        let mut updated = slot.clone();
        self.refresh_snapshot(&mut updated)?;
        *slot = updated.clone();

        self.persist_collection(&collection).await?;

        info!("Updated application {}", id);
        Ok(updated)
    }

    /// Submit a draft application for review
    ///
    /// Fails with [`CoreError::InvalidState`] when the record already left
    /// draft, and with [`CoreError::Validation`] listing every missing
    /// required field when the draft is incomplete.
    pub async fn submit(&self, id: Uuid) -> Result<Application> {
        let application = self
            .get(id)
            .await?
            .ok_or(CoreError::ApplicationNotFound(id))?;

        if application.status != ApplicationStatus::Draft {
            return Err(CoreError::InvalidState(
                "Application already submitted".to_string(),
            ));
        }

        let violations = application.required_field_violations();
        if !violations.is_empty() {
            return Err(CoreError::Validation(violations));
        }

        let submitted = self
            .update(
                id,
                ApplicationUpdate {
                    status: Some(ApplicationStatus::Submitted),
                    submitted_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        info!("Submitted application {}", id);
        Ok(submitted)
    }

    /// Get an application by id; `None` when absent
    pub async fn get(&self, id: Uuid) -> Result<Option<Application>> {
        let collection = self.load_collection().await?;
        Ok(collection.into_iter().find(|app| app.id == id))
    }

    /// List a user's applications in insertion order
    ///
    /// Read failures are swallowed to an empty list; callers cannot tell
    /// "nothing stored" from "storage unreadable".
    pub async fn list_by_user(&self, user_id: Uuid) -> Vec<Application> {
        self.get_all()
            .await
            .into_iter()
            .filter(|app| app.user_id == user_id)
            .collect()
    }

    /// List every stored application in insertion order
    ///
    /// Same swallow policy as [`list_by_user`](Self::list_by_user).
    pub async fn get_all(&self) -> Vec<Application> {
        match self.load_collection().await {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Failed to read application collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Delete an application; no-op when the id is absent
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut collection = self.load_collection().await?;
        let before = collection.len();
        collection.retain(|app| app.id != id);

        if collection.len() == before {
            debug!("Delete of absent application {} ignored", id);
            return Ok(());
        }

        self.persist_collection(&collection).await?;
        info!("Deleted application {}", id);
        Ok(())
    }

    /// Re-encrypt the record's self-snapshot
    ///
    /// The snapshot covers the record without the previous snapshot field,
    /// so it never nests.
    fn refresh_snapshot(&self, application: &mut Application) -> Result<()> {
        application.encrypted_data = None;
        let json = serde_json::to_string(application)?;
        application.encrypted_data = Some(self.cipher.encrypt(&json)?);
        Ok(())
    }

    /// Load and decrypt the full collection
    async fn load_collection(&self) -> Result<Vec<Application>> {
        let raw = match self.storage.get(APPLICATIONS_KEY).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        let encrypted_records: Vec<String> = serde_json::from_str(&raw)?;

        let mut collection = Vec::with_capacity(encrypted_records.len());
        for encrypted in &encrypted_records {
            let json = self.cipher.decrypt(encrypted)?;
            collection.push(serde_json::from_str(&json)?);
        }

        Ok(collection)
    }

    /// Re-encrypt every record and persist the whole collection
    async fn persist_collection(&self, collection: &[Application]) -> Result<()> {
        let mut encrypted_records = Vec::with_capacity(collection.len());
        for application in collection {
            let json = serde_json::to_string(application)?;
            encrypted_records.push(self.cipher.encrypt(&json)?);
        }

        let raw = serde_json::to_string(&encrypted_records)?;
        self.storage.set(APPLICATIONS_KEY, &raw).await?;

        debug!("Persisted {} applications", collection.len());
        Ok(())
    }
}
