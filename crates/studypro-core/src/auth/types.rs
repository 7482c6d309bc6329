//! User and session type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Admin,
    Counselor,
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login email, also used as a secondary lookup key
    pub email: String,
    /// Hex SHA-256 digest of the password
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new student account
    pub fn new_student(
        email: &str,
        password_hash: String,
        first_name: &str,
        last_name: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: UserRole::Student,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// Session token payload
///
/// Serialized, encrypted, and stored as an opaque blob. Its presence is
/// what marks a session as authenticated; it is never parsed back and
/// carries no expiry or signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub user_id: Uuid,
    pub email: String,
    /// Unix timestamp of issuance
    pub issued_at: i64,
}

impl AuthToken {
    /// Issue a token for a freshly logged-in user
    pub fn issue(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            issued_at: Utc::now().timestamp(),
        }
    }
}
