//! Session token issuance and verification

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::{Error, Result};

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Tokens are self-contained: validity is a function of the signature and
/// the `exp` claim only. There is no revocation list, so a leaked token
/// stays valid until it expires.
pub struct TokenIssuer {
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(Error::Config("Signing secret must not be empty".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry must be deterministic; no grace window.
        validation.leeway = 0;

        Ok(Self {
            ttl_seconds: config.ttl_seconds,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
            validation,
        })
    }

    /// Issue a token for `username`, expiring `ttl_seconds` from now.
    pub fn issue(&self, username: &str, user_id: Option<i64>) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.ttl_seconds as i64);

        let claims = Claims {
            username: username.to_string(),
            user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| Error::Config(format!("Token signing failed: {}", e)))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::TokenInvalid,
            }
        })?;

        Ok(data.claims)
    }
}

/// Split an `Authorization: Bearer <token>` header value.
///
/// An absent header means the caller never authenticated; a present but
/// garbled one means the credential itself is bad. The two map to
/// different errors.
pub fn bearer(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or(Error::Unauthorized)?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::TokenInvalid),
    }
}
