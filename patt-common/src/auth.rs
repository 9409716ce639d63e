//! Password hashing and access-token helpers
//!
//! Pure functions plus the database-backed signing-secret bootstrap. No HTTP
//! framework dependencies here — request extraction lives in the API crate.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::{Error, Result};

/// Access tokens are valid for 30 days
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// JWT claims: subject is the account email
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

// ========================================
// Password Hashing
// ========================================

/// Hash a password with a random per-account salt
///
/// Stored form is `<salt-hex>$<sha256-hex>` where the digest covers the salt
/// followed by the password bytes.
pub fn hash_password(password: &str) -> String {
    let salt: u128 = rand::thread_rng().gen();
    let salt_hex = format!("{:032x}", salt);
    format!("{}${}", salt_hex, digest_hex(&salt_hex, password))
}

/// Verify a password against its stored `salt$digest` form
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest)) => digest_hex(salt_hex, password) == digest,
        None => false,
    }
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ========================================
// Access Tokens
// ========================================

/// Issue an HS256 access token for the given account email
pub fn create_access_token(email: &str, secret: &str) -> Result<String> {
    let expires_at = crate::time::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS);
    let claims = Claims {
        sub: email.to_string(),
        exp: expires_at.timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign access token: {}", e)))
}

/// Decode and verify an access token, returning the subject email
///
/// Returns None for malformed, tampered, or expired tokens.
pub fn decode_access_token(token: &str, secret: &str) -> Option<String> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .ok()
}

// ========================================
// Signing Secret Management
// ========================================

/// Load the token signing secret from the settings table
///
/// Generates and stores a fresh random secret on first run, so a new
/// deployment needs no manual key provisioning.
pub async fn load_signing_secret(db: &SqlitePool) -> Result<String> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'token_signing_secret'")
            .fetch_optional(db)
            .await?;

    match result {
        Some((value,)) => Ok(value),
        None => initialize_signing_secret(db).await,
    }
}

/// Generate a random signing secret and store it in the settings table
pub async fn initialize_signing_secret(db: &SqlitePool) -> Result<String> {
    let mut rng = rand::thread_rng();
    let secret = format!("{:032x}{:032x}", rng.gen::<u128>(), rng.gen::<u128>());

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ('token_signing_secret', ?)")
        .bind(&secret)
        .execute(db)
        .await?;

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("correct horse battery");
        assert!(verify_password("correct horse battery", &stored));
        assert!(!verify_password("wrong password", &stored));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let first = hash_password("same password");
        let second = hash_password("same password");
        // Different salts produce different stored forms
        assert_ne!(first, second);
        assert!(verify_password("same password", &first));
        assert!(verify_password("same password", &second));
    }

    #[test]
    fn test_malformed_stored_hash_rejected() {
        assert!(!verify_password("anything", "no-separator-here"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_access_token("r@x.com", "test-secret").unwrap();
        assert_eq!(
            decode_access_token(&token, "test-secret").as_deref(),
            Some("r@x.com")
        );
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = create_access_token("r@x.com", "test-secret").unwrap();
        assert_eq!(decode_access_token(&token, "other-secret"), None);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(decode_access_token("not.a.token", "test-secret"), None);
    }
}
