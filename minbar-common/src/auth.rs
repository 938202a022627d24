//! Server-side session verification
//!
//! Session records are written by the authentication service, which shares
//! the SQLite database. This module verifies presented bearer tokens
//! against stored SHA-256 digests; plaintext tokens are never persisted.
//!
//! The UI-side login redirect is purely cosmetic. Enforcement happens here,
//! at the trusted boundary.

use crate::Result;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

/// Role required for upload and other administrative operations
pub const ROLE_ADMIN: &str = "admin";
/// Default role for authenticated platform users
pub const ROLE_STUDENT: &str = "student";

/// A verified session
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Hex SHA-256 digest of a session token (64 hex characters)
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a fresh random session token (64 hex characters)
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Create a session row and return the plaintext token
///
/// Called by the authentication service (and by tests). Only the digest
/// is stored.
pub async fn create_session(
    db: &SqlitePool,
    user_id: &str,
    role: &str,
    ttl: Duration,
) -> Result<String> {
    let token = generate_token();
    let expires_at = Utc::now() + ttl;

    sqlx::query(
        "INSERT OR REPLACE INTO sessions (token_digest, user_id, role, expires_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(token_digest(&token))
    .bind(user_id)
    .bind(role)
    .bind(expires_at.timestamp())
    .execute(db)
    .await?;

    Ok(token)
}

/// Verify a presented token against the sessions table
///
/// Returns `None` for unknown tokens and for expired sessions.
pub async fn verify_session(db: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let row: Option<(String, String, i64)> = sqlx::query_as(
        "SELECT user_id, role, expires_at FROM sessions WHERE token_digest = ?",
    )
    .bind(token_digest(token))
    .fetch_optional(db)
    .await?;

    let Some((user_id, role, expires)) = row else {
        return Ok(None);
    };

    let expires_at =
        DateTime::<Utc>::from_timestamp(expires, 0).unwrap_or(DateTime::<Utc>::MIN_UTC);
    if expires_at <= Utc::now() {
        return Ok(None);
    }

    Ok(Some(Session {
        user_id,
        role,
        expires_at,
    }))
}

/// Delete expired session rows, returning the number removed
pub async fn purge_expired_sessions(db: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now().timestamp())
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_digest_is_64_hex_chars() {
        let digest = token_digest("some-token");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_digest_is_deterministic() {
        assert_eq!(token_digest("abc"), token_digest("abc"));
        assert_ne!(token_digest("abc"), token_digest("abd"));
    }

    #[test]
    fn test_generate_token_is_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
