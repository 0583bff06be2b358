//! Profile storage

use shared::models::{Profile, Role};
use sqlx::SqlitePool;

use super::RepoResult;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    role: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            role: Role::from_stored(row.role.as_deref()),
            id: row.id,
            email: row.email,
        }
    }
}

/// Profile of a user; a NULL stored role reads as staff
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>("SELECT id, email, role FROM profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Profile::from))
}

/// All profiles, sorted by email
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Profile>> {
    let rows = sqlx::query_as::<_, ProfileRow>("SELECT id, email, role FROM profiles ORDER BY email")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Profile::from).collect())
}

pub async fn set_role(pool: &SqlitePool, id: &str, role: Role) -> RepoResult<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET role = ? WHERE id = ? RETURNING id, email, role",
    )
    .bind(role.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Profile::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    #[tokio::test]
    async fn test_null_role_reads_as_staff() {
        let pool = test_pool().await;
        let profile = users::create_with_profile(&pool, "a@example.com", "h", Role::Admin)
            .await
            .unwrap();
        sqlx::query("UPDATE profiles SET role = NULL WHERE id = ?")
            .bind(&profile.id)
            .execute(&pool)
            .await
            .unwrap();

        let found = find_by_id(&pool, &profile.id).await.unwrap().unwrap();
        assert_eq!(found.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_list_sorted_and_set_role() {
        let pool = test_pool().await;
        users::create_with_profile(&pool, "zoe@example.com", "h", Role::Staff).await.unwrap();
        let amy = users::create_with_profile(&pool, "amy@example.com", "h", Role::Staff)
            .await
            .unwrap();

        let emails: Vec<_> = list(&pool).await.unwrap().into_iter().map(|p| p.email).collect();
        assert_eq!(emails, vec!["amy@example.com", "zoe@example.com"]);

        let updated = set_role(&pool, &amy.id, Role::Admin).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert!(set_role(&pool, "ghost", Role::Admin).await.unwrap().is_none());
    }
}
