//! Input validation for registration and login payloads

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::PasswordConfig;
use crate::types::{LoginRequest, RegisterRequest};
use crate::{Error, Result};

// Regex patterns for validation
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s]{1,64}$").unwrap());
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate username format
pub fn validate_username(username: &str) -> std::result::Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::new("invalid_username_format"));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> std::result::Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::new("invalid_email_format"));
    }
    Ok(())
}

/// Check a registration payload, returning a trimmed copy.
pub fn validate_registration(
    req: &RegisterRequest,
    password: &PasswordConfig,
) -> Result<RegisterRequest> {
    let username = req.username.trim();
    let email = req.email.trim();
    let pw = req.password.trim();

    if username.is_empty() || email.is_empty() || pw.is_empty() {
        return Err(Error::Validation(
            "All fields are required (username, email, password)".to_string(),
        ));
    }

    if validate_username(username).is_err() {
        return Err(Error::Validation("Invalid username".to_string()));
    }

    if validate_email(email).is_err() {
        return Err(Error::Validation("Invalid email address".to_string()));
    }

    if pw.len() < password.min_length {
        return Err(Error::Validation(format!(
            "Password must be at least {} characters",
            password.min_length
        )));
    }

    if pw.len() > password.max_length {
        return Err(Error::Validation(format!(
            "Password must not exceed {} characters",
            password.max_length
        )));
    }

    Ok(RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: pw.to_string(),
    })
}

/// Check a login payload for presence of both fields.
pub fn validate_login(req: &LoginRequest) -> Result<()> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(Error::Validation(
            "Username and password are required".to_string(),
        ));
    }
    Ok(())
}
