//! Local registration and login over the secure store
//!
//! Storage layout: one `user_<id>` entry per account, one `email_<email>`
//! lookup entry per email, plus the `current_user` and `auth_token`
//! singletons for the active session.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{AuthToken, User};
use crate::crypto::{hash_password, Cipher};
use crate::error::{CoreError, Result};
use crate::storage::SecureStorage;

/// Storage key for the active user
const CURRENT_USER_KEY: &str = "current_user";
/// Storage key for the session token
const TOKEN_KEY: &str = "auth_token";

fn user_key(id: &str) -> String {
    format!("user_{}", id)
}

fn email_key(email: &str) -> String {
    format!("email_{}", email)
}

/// Session and identity service
pub struct AuthService {
    /// Storage backend
    storage: Arc<dyn SecureStorage>,
    /// Cipher for token blobs
    cipher: Arc<Cipher>,
}

impl AuthService {
    /// Create a new auth service over the given storage and cipher
    pub fn new(storage: Arc<dyn SecureStorage>, cipher: Arc<Cipher>) -> Self {
        Self { storage, cipher }
    }

    /// Register a new student account
    ///
    /// A second registration under the same email silently overwrites the
    /// email lookup entry; the older account becomes unreachable by login.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User> {
        let user = User::new_student(email, hash_password(password), first_name, last_name);

        self.save_user(&user).await?;
        self.storage
            .set(&email_key(email), &user.id.to_string())
            .await?;

        info!("Registered user {} ({})", user.id, email);
        Ok(user)
    }

    /// Log a user in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user_id = self
            .storage
            .get(&email_key(email))
            .await?
            .ok_or(CoreError::UserNotFound)?;

        let user_json = self
            .storage
            .get(&user_key(&user_id))
            .await?
            .ok_or(CoreError::UserNotFound)?;

        let mut user: User = serde_json::from_str(&user_json)?;

        if hash_password(password) != user.password_hash {
            return Err(CoreError::InvalidPassword);
        }

        user.last_login = Some(Utc::now());
        self.save_user(&user).await?;

        // mark the session: active user plus an opaque token blob
        self.storage
            .set(CURRENT_USER_KEY, &serde_json::to_string(&user)?)
            .await?;

        let token = serde_json::to_string(&AuthToken::issue(&user))?;
        self.storage
            .set(TOKEN_KEY, &self.cipher.encrypt(&token)?)
            .await?;

        info!("User {} logged in", user.id);
        Ok(user)
    }

    /// End the active session
    ///
    /// Only the session entries are removed; registered accounts and
    /// application data stay in the store.
    pub async fn logout(&self) -> Result<()> {
        self.storage.remove(CURRENT_USER_KEY).await?;
        self.storage.remove(TOKEN_KEY).await?;

        info!("Logged out");
        Ok(())
    }

    /// The currently logged-in user, if any
    ///
    /// Unreadable session state is treated as "not logged in".
    pub async fn current_user(&self) -> Option<User> {
        match self.storage.get(CURRENT_USER_KEY).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Stored current user is unreadable: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read current user: {}", e);
                None
            }
        }
    }

    /// Whether a session token is present and decryptable
    pub async fn is_authenticated(&self) -> bool {
        match self.storage.get(TOKEN_KEY).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                debug!("Session token unreadable: {}", e);
                false
            }
        }
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        self.storage
            .set(&user_key(&user.id.to_string()), &serde_json::to_string(user)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, generate_salt, KeyDerivationParams};
    use crate::storage::EncryptedFileStorage;
    use tempfile::TempDir;

    fn test_cipher() -> Arc<Cipher> {
        let params = KeyDerivationParams {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
        };
        let salt = generate_salt();
        Arc::new(Cipher::new(derive_key("test", &salt, Some(params)).unwrap()))
    }

    fn test_service() -> (AuthService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cipher = test_cipher();
        let storage = Arc::new(
            EncryptedFileStorage::with_dir(temp_dir.path().to_path_buf(), cipher.clone()).unwrap(),
        );
        (AuthService::new(storage, cipher), temp_dir)
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (auth, _temp) = test_service();

        let registered = auth
            .register("ada@example.com", "pa55word", "Ada", "Bello")
            .await
            .unwrap();
        assert!(registered.last_login.is_none());

        let logged_in = auth.login("ada@example.com", "pa55word").await.unwrap();

        assert_eq!(logged_in.id, registered.id);
        assert!(logged_in.last_login.is_some());
        assert!(auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (auth, _temp) = test_service();

        auth.register("ada@example.com", "pa55word", "Ada", "Bello")
            .await
            .unwrap();

        let result = auth.login("ada@example.com", "wrong").await;
        assert!(matches!(result, Err(CoreError::InvalidPassword)));
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (auth, _temp) = test_service();

        let result = auth.login("nobody@example.com", "pw").await;
        assert!(matches!(result, Err(CoreError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_logout_clears_session_only() {
        let (auth, _temp) = test_service();

        auth.register("ada@example.com", "pa55word", "Ada", "Bello")
            .await
            .unwrap();
        auth.login("ada@example.com", "pa55word").await.unwrap();

        auth.logout().await.unwrap();

        assert!(auth.current_user().await.is_none());
        assert!(!auth.is_authenticated().await);

        // account survives and can log back in
        auth.login("ada@example.com", "pa55word").await.unwrap();
    }

    #[tokio::test]
    async fn test_current_user_after_login() {
        let (auth, _temp) = test_service();

        let registered = auth
            .register("ada@example.com", "pa55word", "Ada", "Bello")
            .await
            .unwrap();

        assert!(auth.current_user().await.is_none());

        auth.login("ada@example.com", "pa55word").await.unwrap();

        let current = auth.current_user().await.unwrap();
        assert_eq!(current.id, registered.id);
        assert_eq!(current.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_overwrites_lookup() {
        let (auth, _temp) = test_service();

        auth.register("ada@example.com", "first-pw", "Ada", "Bello")
            .await
            .unwrap();
        let second = auth
            .register("ada@example.com", "second-pw", "Ada", "Okafor")
            .await
            .unwrap();

        // login resolves to the later registration
        let logged_in = auth.login("ada@example.com", "second-pw").await.unwrap();
        assert_eq!(logged_in.id, second.id);

        let result = auth.login("ada@example.com", "first-pw").await;
        assert!(matches!(result, Err(CoreError::InvalidPassword)));
    }
}
