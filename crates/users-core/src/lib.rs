//! # Helpdesk Users-Core
//!
//! User accounts and authentication for the helpdesk service.
//!
//! This crate provides:
//! - User storage in SQLite
//! - Password hashing with Argon2
//! - Signed, time-limited session tokens (HS256)
//! - Registration/login flows and caller authentication
//!
//! ## Architecture
//!
//! Users-core issues and verifies credentials; request-level authorization
//! (ownership and administrator checks) lives in requests-core and calls
//! back into the [`UserStore`] for fresh role flags.

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod password;
pub mod types;
pub mod user_store;
pub mod validation;

pub use auth::AuthService;
pub use config::{JwtConfig, PasswordConfig, UsersConfig};
pub use error::{Error, Result};
pub use jwt::{Claims, TokenIssuer};
pub use password::PasswordHasher;
pub use types::{AuthOutcome, Identity, LoginRequest, RegisterRequest, User};
pub use user_store::{connect, SqliteUserStore, UserStore};

use std::sync::Arc;

/// Initialize the account service on its own connection pool.
pub async fn init(config: UsersConfig) -> Result<AuthService> {
    let pool = user_store::connect(&config.database_url).await?;
    let store = SqliteUserStore::new(pool).await?;

    AuthService::new(Arc::new(store), &config.jwt, config.password)
}
