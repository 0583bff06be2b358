//! Menu history storage
//!
//! The menu document is stored as JSON text in `menu_data`.

use shared::models::{HistoryCreate, HistoryRecord};
use shared::util::{new_id, now_millis};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const COLUMNS: &str =
    "id, user_id, title, menu_data, client_name, event_name, guest_count, event_date, created_at";

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: String,
    user_id: String,
    title: String,
    menu_data: String,
    client_name: String,
    event_name: String,
    guest_count: i64,
    event_date: String,
    created_at: i64,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = RepoError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let menu = serde_json::from_str(&row.menu_data)
            .map_err(|e| RepoError::Corrupted(format!("menus/{}: {e}", row.id)))?;
        Ok(HistoryRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            menu,
            client_name: row.client_name,
            event_name: row.event_name,
            guest_count: u32::try_from(row.guest_count).unwrap_or_default(),
            event_date: row.event_date,
            created_at: row.created_at,
        })
    }
}

/// Archive a menu for `user_id`; the title is taken from the menu
pub async fn create(
    pool: &SqlitePool,
    user_id: &str,
    data: HistoryCreate,
) -> RepoResult<HistoryRecord> {
    let menu_data =
        serde_json::to_string(&data.menu).map_err(|e| RepoError::Validation(e.to_string()))?;
    let record = HistoryRecord {
        id: new_id(),
        user_id: user_id.to_string(),
        title: data.menu.title.clone(),
        menu: data.menu,
        client_name: data.client_name,
        event_name: data.event_name,
        guest_count: data.guest_count,
        event_date: data.event_date,
        created_at: now_millis(),
    };

    sqlx::query(
        "INSERT INTO menus (id, user_id, title, menu_data, client_name, event_name, guest_count, event_date, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.title)
    .bind(menu_data)
    .bind(&record.client_name)
    .bind(&record.event_name)
    .bind(i64::from(record.guest_count))
    .bind(&record.event_date)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(record)
}

/// All records, newest first
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<HistoryRecord>> {
    let rows = sqlx::query_as::<_, HistoryRow>(&format!(
        "SELECT {COLUMNS} FROM menus ORDER BY created_at DESC, rowid DESC"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(HistoryRecord::try_from).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<HistoryRecord>> {
    let row = sqlx::query_as::<_, HistoryRow>(&format!("SELECT {COLUMNS} FROM menus WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(HistoryRecord::try_from).transpose()
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM menus WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{sample_menu, test_pool};

    #[tokio::test]
    async fn test_round_trip_preserves_menu() {
        let pool = test_pool().await;
        let menu = sample_menu("Patel Wedding");
        let created = create(
            &pool,
            "u1",
            HistoryCreate {
                menu: menu.clone(),
                client_name: "Patel".to_string(),
                event_name: "Patel Wedding".to_string(),
                guest_count: 120,
                event_date: "2026-11-02".to_string(),
            },
        )
        .await
        .unwrap();

        let found = find_by_id(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(found.menu, menu);
        assert_eq!(found.title, "Patel Wedding");
        assert_eq!(found.guest_count, 120);
        assert_eq!(
            serde_json::to_string(&found.menu).unwrap(),
            serde_json::to_string(&menu).unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let pool = test_pool().await;
        let first = HistoryCreate {
            menu: sample_menu("First"),
            client_name: String::new(),
            event_name: String::new(),
            guest_count: 0,
            event_date: String::new(),
        };
        let mut second = first.clone();
        second.menu.title = "Second".to_string();

        let a = create(&pool, "u1", first).await.unwrap();
        create(&pool, "u2", second).await.unwrap();

        let titles: Vec<_> = list(&pool).await.unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Second", "First"]);

        assert!(delete(&pool, &a.id).await.unwrap());
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupted_menu_data_is_reported() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO menus (id, user_id, title, menu_data, created_at) VALUES ('m1', 'u1', 't', '{oops', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        assert!(matches!(
            find_by_id(&pool, "m1").await.unwrap_err(),
            RepoError::Corrupted(_)
        ));
    }
}
