//! User account storage

use shared::models::{Profile, Role};
use shared::util::{new_id, now_millis};
use sqlx::{SqliteExecutor, SqlitePool};

use super::{RepoError, RepoResult};

/// Account row, including the password hash. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Whether the account still exists
pub async fn exists(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Create an account and its profile in one transaction
///
/// Emails are stored lowercased; a taken email yields `RepoError::Duplicate`.
pub async fn create_with_profile(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> RepoResult<Profile> {
    let id = new_id();
    let email = email.trim().to_lowercase();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&email)
        .bind(password_hash)
        .bind(now_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate(format!("{email} is already registered")),
            other => other,
        })?;

    sqlx::query("INSERT INTO profiles (id, email, role) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&email)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Profile { id, email, role })
}

pub async fn update_password<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    password_hash: &str,
) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete an account; profile and refresh tokens cascade, history rows stay.
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{profiles, test_pool};

    #[tokio::test]
    async fn test_create_with_profile_lowercases_email() {
        let pool = test_pool().await;
        let profile = create_with_profile(&pool, " Chef@Example.com ", "hash", Role::Staff)
            .await
            .unwrap();
        assert_eq!(profile.email, "chef@example.com");

        let row = find_by_email(&pool, "chef@example.com").await.unwrap().unwrap();
        assert_eq!(row.id, profile.id);
        assert_eq!(
            profiles::find_by_id(&pool, &profile.id).await.unwrap().unwrap().role,
            Role::Staff
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_case_insensitively() {
        let pool = test_pool().await;
        create_with_profile(&pool, "a@example.com", "h", Role::Staff).await.unwrap();
        let err = create_with_profile(&pool, "A@EXAMPLE.COM", "h", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_profile() {
        let pool = test_pool().await;
        let profile = create_with_profile(&pool, "a@example.com", "h", Role::Admin)
            .await
            .unwrap();
        assert!(delete(&pool, &profile.id).await.unwrap());
        assert!(profiles::find_by_id(&pool, &profile.id).await.unwrap().is_none());
        assert!(!delete(&pool, &profile.id).await.unwrap());
    }
}
