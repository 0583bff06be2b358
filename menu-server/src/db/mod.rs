//! Database access layer
//!
//! One module per table. Functions take a `&SqlitePool` (or a transaction
//! where a write must be atomic with others) and return [`RepoResult`].

pub mod banners;
pub mod dishes;
pub mod history;
pub mod password_resets;
pub mod profiles;
pub mod refresh_tokens;
pub mod sub_items;
pub mod users;

use std::str::FromStr;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Corrupted row: {0}")]
    Corrupted(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::NotFound(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Corrupted(msg) => {
                tracing::error!(error = %msg, "Stored row could not be decoded");
                AppError::new(ErrorCode::MenuDataCorrupted)
            }
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open the SQLite pool and apply migrations
///
/// WAL journal, foreign keys on, `busy_timeout` 5s. An in-memory URL gets a
/// single long-lived connection so every query sees the same database.
pub async fn connect(database_url: &str) -> RepoResult<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(5));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(in_memory, "Database connection established");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| RepoError::Database(format!("Failed to apply migrations: {e}")))?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Encode a tag list for a JSON text column
pub(crate) fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags).map_err(|e| RepoError::Validation(e.to_string()))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

#[cfg(test)]
pub(crate) fn sample_dish(name: &str, category: &str, cuisine: &str) -> shared::models::DishCreate {
    shared::models::DishCreate {
        name: name.to_string(),
        description: format!("{name} description"),
        dietary_tags: vec!["Veg".to_string()],
        image_url: None,
        category: category.to_string(),
        cuisine: cuisine.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn sample_menu(title: &str) -> shared::models::Menu {
    use shared::models::{Menu, MenuItem, Section};

    Menu {
        title: title.to_string(),
        event_description: "A wedding curated exclusively for <b>the Patels</b>.".to_string(),
        sections: vec![Section {
            id: None,
            category: "Main Course Selection".to_string(),
            items: vec![MenuItem {
                id: Some("d1".to_string()),
                name: "Dal Makhani".to_string(),
                description: "Slow-cooked black lentils".to_string(),
                dietary_tags: vec!["Veg".to_string()],
                image_url: None,
                sub_items: vec![],
            }],
        }],
        wine_pairing: "Red".to_string(),
        chefs_notes: "Notes".to_string(),
        banner_url: "https://example.com/banner.jpg".to_string(),
        cuisine_label: "Indian".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_apply_on_memory_pool() {
        let pool = test_pool().await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dishes")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_foreign_key_violation_maps_to_not_found() {
        let pool = test_pool().await;
        let err = sqlx::query(
            "INSERT INTO sub_items (id, dish_id, name) VALUES ('s1', 'missing', 'x')",
        )
        .execute(&pool)
        .await
        .unwrap_err();
        assert!(matches!(RepoError::from(err), RepoError::NotFound(_)));
    }
}
