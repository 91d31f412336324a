//! Service configuration

use config::{Config, ConfigError, Environment};
use helpdesk_users_core::{JwtConfig, PasswordConfig};
use serde::Deserialize;

/// Everything the server binary needs, assembled from defaults overlaid
/// with `HELPDESK_`-prefixed environment variables
/// (e.g. `HELPDESK_BIND_ADDRESS`, `HELPDESK_JWT__SECRET`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("database_url", defaults.database_url)?
            .set_default("jwt.secret", defaults.jwt.secret)?
            .set_default("jwt.ttl_seconds", defaults.jwt.ttl_seconds as i64)?
            .set_default("password.min_length", defaults.password.min_length as i64)?
            .set_default("password.max_length", defaults.password.max_length as i64)?
            .set_default(
                "password.argon2_memory_cost",
                defaults.password.argon2_memory_cost as i64,
            )?
            .set_default(
                "password.argon2_time_cost",
                defaults.password.argon2_time_cost as i64,
            )?
            .set_default(
                "password.argon2_parallelism",
                defaults.password.argon2_parallelism as i64,
            )?
            .add_source(Environment::with_prefix("HELPDESK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            database_url: "sqlite://helpdesk.db?mode=rwc".to_string(),
            jwt: JwtConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}
