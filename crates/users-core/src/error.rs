//! Error types for account and authentication operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authorization required")]
    Unauthorized,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt stored data: {0}")]
    CorruptData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Conflict("user".to_string())
            }
            _ => Error::Storage(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
