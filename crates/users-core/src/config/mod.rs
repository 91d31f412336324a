//! Configuration for helpdesk-users-core

use serde::Deserialize;

/// Main configuration for the account service
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

/// Token signing configuration
///
/// The secret is process-wide and read-only after startup; rotating it
/// requires a redeploy and invalidates every outstanding token.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: u64,
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub argon2_memory_cost: u32,
    pub argon2_time_cost: u32,
    pub argon2_parallelism: u32,
}

impl JwtConfig {
    /// True while the compiled-in development secret is still in use.
    pub fn is_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}

const DEV_SECRET: &str = "helpdesk-dev-secret";

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://helpdesk.db?mode=rwc".to_string(),
            jwt: JwtConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            ttl_seconds: 86_400, // 24 hours
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 128,
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }
}
