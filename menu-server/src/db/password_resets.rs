//! One-time password reset codes (stored hashed)

use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResetRow {
    pub email: String,
    pub code_hash: String,
    pub attempts: i64,
    pub expires_at: i64,
}

/// Store a code for `email`, replacing any earlier one and resetting attempts
pub async fn upsert(
    pool: &SqlitePool,
    email: &str,
    code_hash: &str,
    expires_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO password_resets (email, code_hash, attempts, expires_at, created_at) \
         VALUES (?, ?, 0, ?, ?) \
         ON CONFLICT(email) DO UPDATE SET \
            code_hash = excluded.code_hash, attempts = 0, \
            expires_at = excluded.expires_at, created_at = excluded.created_at",
    )
    .bind(email)
    .bind(code_hash)
    .bind(expires_at)
    .bind(now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &SqlitePool, email: &str) -> RepoResult<Option<ResetRow>> {
    let row = sqlx::query_as::<_, ResetRow>(
        "SELECT email, code_hash, attempts, expires_at FROM password_resets WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn increment_attempts(pool: &SqlitePool, email: &str) -> RepoResult<()> {
    sqlx::query("UPDATE password_resets SET attempts = attempts + 1 WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, email: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM password_resets WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}
