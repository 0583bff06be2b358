//! Banner image overrides per cuisine label

use sqlx::SqlitePool;

use super::RepoResult;

pub async fn find(pool: &SqlitePool, cuisine: &str) -> RepoResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT image_url FROM banners WHERE cuisine = ?")
        .bind(cuisine)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(url,)| url))
}

pub async fn upsert(pool: &SqlitePool, cuisine: &str, image_url: &str) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO banners (cuisine, image_url) VALUES (?, ?) \
         ON CONFLICT(cuisine) DO UPDATE SET image_url = excluded.image_url",
    )
    .bind(cuisine)
    .bind(image_url)
    .execute(pool)
    .await?;
    Ok(())
}
