use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// Claims carried by a password-reset token.
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    /// Guide id the token was issued for.
    sub: i32,
    exp: i64,
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
/// The returned PHC string is what goes into storage.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored hash. A wrong password is
/// `false`, never an error; an unparsable stored hash also verifies false.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        debug!("stored password hash did not parse");
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Issue a signed, time-limited password-reset token for a guide.
pub fn issue_reset_token(secret: &str, guide_id: i32, ttl_seconds: i64) -> Result<String, AppError> {
    let claims = ResetClaims {
        sub: guide_id,
        exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("reset token encoding failed: {e}")))
}

/// Resolve a reset token back to the guide id it was issued for.
/// Bad signature, expiry, or a malformed token all come back as `None`;
/// the caller sends the user back to the re-request flow.
pub fn verify_reset_token(secret: &str, token: &str) -> Option<i32> {
    let mut validation = Validation::default();
    // Expiry is exact; no clock leeway.
    validation.leeway = 0;

    match decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Some(data.claims.sub),
        Err(err) => {
            debug!("reset token rejected: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same input").unwrap();
        let second = hash_password("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_tolerates_garbage_hash() {
        assert!(!verify_password("anything", "not a phc string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_reset_token_round_trip() {
        let token = issue_reset_token("secret", 42, 1800).unwrap();
        assert_eq!(verify_reset_token("secret", &token), Some(42));
    }

    #[test]
    fn test_reset_token_expires() {
        let token = issue_reset_token("secret", 42, -10).unwrap();
        assert_eq!(verify_reset_token("secret", &token), None);
    }

    #[test]
    fn test_reset_token_wrong_secret() {
        let token = issue_reset_token("secret", 42, 1800).unwrap();
        assert_eq!(verify_reset_token("other secret", &token), None);
    }

    #[test]
    fn test_reset_token_tampered() {
        let token = issue_reset_token("secret", 42, 1800).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(verify_reset_token("secret", &tampered), None);
        assert_eq!(verify_reset_token("secret", "not-a-token"), None);
    }
}
