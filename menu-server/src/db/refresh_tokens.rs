//! Refresh token storage
//!
//! Only the SHA-256 of a token is stored. Rotation is a single conditional
//! UPDATE, so a token can be redeemed at most once.

use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use shared::util::{new_id, now_millis};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> RepoResult<String> {
    let mut bytes = [0u8; 32];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| RepoError::Database("Failed to generate refresh token".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Issue a new refresh token for a user
pub async fn create(pool: &SqlitePool, user_id: &str, ttl_days: i64) -> RepoResult<String> {
    let token = generate_token()?;
    let expires_at = now_millis() + ttl_days * DAY_MS;

    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(new_id())
    .bind(user_id)
    .bind(hash_token(&token))
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(token)
}

/// Validate and rotate a refresh token. Returns `(user_id, new_refresh_token)`,
/// or `None` for an unknown, revoked or expired token.
pub async fn rotate(
    pool: &SqlitePool,
    refresh_token: &str,
    ttl_days: i64,
) -> RepoResult<Option<(String, String)>> {
    let revoked: Option<(String,)> = sqlx::query_as(
        "UPDATE refresh_tokens SET revoked = 1 \
         WHERE token_hash = ? AND revoked = 0 AND expires_at > ? \
         RETURNING user_id",
    )
    .bind(hash_token(refresh_token))
    .bind(now_millis())
    .fetch_optional(pool)
    .await?;

    let Some((user_id,)) = revoked else {
        return Ok(None);
    };

    let new_token = create(pool, &user_id, ttl_days).await?;
    Ok(Some((user_id, new_token)))
}

/// Revoke all refresh tokens of a user
pub async fn revoke_all(pool: &SqlitePool, user_id: &str) -> RepoResult<()> {
    sqlx::query("UPDATE refresh_tokens SET revoked = 1 WHERE user_id = ? AND revoked = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
