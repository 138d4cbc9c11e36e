//! Password hashing and login checks.
//!
//! Passwords are stored as argon2id PHC strings (`$argon2id$v=19$...`), which
//! carry their own salt and cost parameters.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::auth::models::{Principal, UserRecord};
use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes `password` with a fresh random salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// False on mismatch and on a malformed stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash is malformed: {e}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Verified against for unknown usernames so both paths cost one argon2 run.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("no-such-user-password").ok())
        .as_deref()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    InvalidCredentials,
    Expired,
}

/// Checks a login attempt. Unknown users still pay for one hash.
pub fn check_login(
    user: Option<&UserRecord>,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Principal, LoginRejection> {
    let Some(user) = user else {
        if let Some(dummy) = dummy_hash() {
            let _ = verify_password(password, dummy);
        }
        return Err(LoginRejection::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        return Err(LoginRejection::InvalidCredentials);
    }
    if user.is_expired(now) {
        return Err(LoginRejection::Expired);
    }
    Ok(user.principal())
}
