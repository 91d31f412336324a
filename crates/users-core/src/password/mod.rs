//! Salted one-way password hashing

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::PasswordConfig;
use crate::{Error, Result};

/// Argon2id hasher with a fresh random salt per call.
///
/// Hashes are stored as PHC strings, so the parameters a hash was created
/// with travel with it and verification keeps working across cost changes.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    max_length: usize,
}

impl PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| Error::Config(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            max_length: config.max_length,
        })
    }

    /// Hash a plaintext password into an opaque PHC string.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(Error::Validation("Password must not be empty".to_string()));
        }
        if plaintext.len() > self.max_length {
            return Err(Error::Validation(format!(
                "Password must not exceed {} characters",
                self.max_length
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("Password hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a hash that cannot be parsed is an
    /// error. Comparison inside the argon2 crate is constant-time.
    pub fn verify(&self, stored: &str, plaintext: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| Error::CorruptData(format!("Stored password hash is malformed: {}", e)))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::CorruptData(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}
