//! # studypro-core
//!
//! Core persistence for Study Pro Global including:
//! - AES-256-GCM encryption with Argon2id key derivation
//! - Encrypting key-value storage with atomic file persistence
//! - Application lifecycle (draft to submitted) with submit-time validation
//! - Local user registration and session handling

pub mod application;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;
mod app;

pub use app::StudyPro;
pub use application::{
    Application, ApplicationRepository, ApplicationStatus, ApplicationUpdate, DegreeLevel,
    Documents, EducationalBackground, EnglishProficiency, EnglishTestType, NewApplication,
    PersonalInfo, UniversityPreferences,
};
pub use auth::{AuthService, AuthToken, User, UserRole};
pub use config::CoreConfig;
pub use crypto::{derive_key, generate_salt, hash_password, Cipher, MasterKey};
pub use error::{CoreError, Result};
pub use storage::{EncryptedFileStorage, SecureStorage};
