//! User registration and session handling

mod service;
mod types;

pub use service::AuthService;
pub use types::{AuthToken, User, UserRole};
