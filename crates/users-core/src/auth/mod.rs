//! Registration, login and caller authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{JwtConfig, PasswordConfig};
use crate::jwt::{self, TokenIssuer};
use crate::password::PasswordHasher;
use crate::types::{AuthOutcome, Identity, LoginRequest, RegisterRequest};
use crate::user_store::UserStore;
use crate::validation;
use crate::{Error, Result};

/// Authentication service: owns the credential store, the password hasher
/// and the token issuer.
///
/// A caller is anonymous until `register` or `login` succeeds; any failure
/// along the way leaves no authenticated state behind.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    password_config: PasswordConfig,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        jwt: &JwtConfig,
        password: PasswordConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            hasher: PasswordHasher::new(&password)?,
            tokens: TokenIssuer::new(jwt)?,
            password_config: password,
        })
    }

    pub fn user_store(&self) -> Arc<dyn UserStore> {
        self.store.clone()
    }

    /// Register a new account and log it in.
    ///
    /// Uniqueness races with a concurrent registration surface as
    /// `Conflict`; the store's UNIQUE constraints are the final arbiter.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthOutcome> {
        let req = validation::validate_registration(req, &self.password_config)?;

        let password_hash = self.hasher.hash(&req.password)?;
        let user = self
            .store
            .create_user(&req.username, &req.email, &password_hash)
            .await?;

        let token = self.tokens.issue(&user.username, Some(user.id))?;
        info!(user_id = user.id, username = %user.username, "registered");

        Ok(AuthOutcome {
            user_id: user.id,
            username: user.username,
            is_partner: user.is_partner,
            token,
        })
    }

    /// Log an existing account in.
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthOutcome> {
        validation::validate_login(req)?;

        let user = self
            .store
            .find_by_username(req.username.trim())
            .await?
            .ok_or_else(|| Error::NotFound("User".to_string()))?;

        if !self.hasher.verify(&user.password_hash, &req.password)? {
            debug!(username = %user.username, "wrong password");
            return Err(Error::Unauthorized);
        }

        let token = self.tokens.issue(&user.username, Some(user.id))?;
        info!(user_id = user.id, username = %user.username, "logged in");

        Ok(AuthOutcome {
            user_id: user.id,
            username: user.username,
            is_partner: user.is_partner,
            token,
        })
    }

    /// Resolve the caller behind an `Authorization` header value.
    ///
    /// The token's username must still resolve to a stored account; a valid
    /// token for a user that no longer exists is `NotFound`.
    pub async fn authenticate(&self, raw_header: Option<&str>) -> Result<Identity> {
        let token = jwt::bearer(raw_header)?;
        let claims = self.tokens.verify(token)?;

        let user = self
            .store
            .find_by_username(&claims.username)
            .await?
            .ok_or_else(|| Error::NotFound("User".to_string()))?;

        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }

    /// Administrator flag for a caller, read fresh from the store.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool> {
        self.store.is_partner(user_id).await
    }
}
