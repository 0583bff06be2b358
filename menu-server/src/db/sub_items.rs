//! Sub-item storage

use std::collections::HashMap;

use shared::models::{Dish, SubItem, SubItemCreate, SubItemUpdate};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

use super::{RepoResult, encode_tags};

const COLUMNS: &str = "id, dish_id, name, description, dietary_tags";

pub async fn find_by_dish(pool: &SqlitePool, dish_id: &str) -> RepoResult<Vec<SubItem>> {
    let items = sqlx::query_as::<_, SubItem>(&format!(
        "SELECT {COLUMNS} FROM sub_items WHERE dish_id = ? ORDER BY name"
    ))
    .bind(dish_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_by_id<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
) -> RepoResult<Option<SubItem>> {
    let item = sqlx::query_as::<_, SubItem>(&format!("SELECT {COLUMNS} FROM sub_items WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(item)
}

/// Load the sub-items of every dish in one query
pub async fn attach_to(pool: &SqlitePool, dishes: &mut [Dish]) -> RepoResult<()> {
    if dishes.is_empty() {
        return Ok(());
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM sub_items WHERE dish_id IN ("));
    let mut sep = qb.separated(", ");
    for dish in dishes.iter() {
        sep.push_bind(dish.id.clone());
    }
    sep.push_unseparated(") ORDER BY name");

    let items = qb.build_query_as::<SubItem>().fetch_all(pool).await?;

    let mut by_dish: HashMap<String, Vec<SubItem>> = HashMap::new();
    for item in items {
        by_dish.entry(item.dish_id.clone()).or_default().push(item);
    }
    for dish in dishes.iter_mut() {
        dish.sub_items = by_dish.remove(&dish.id).unwrap_or_default();
    }
    Ok(())
}

/// Insert a sub-item with a caller-chosen id. An unknown dish yields
/// `RepoError::NotFound` through the foreign key.
pub async fn create<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    dish_id: &str,
    data: &SubItemCreate,
) -> RepoResult<SubItem> {
    let item = sqlx::query_as::<_, SubItem>(&format!(
        "INSERT INTO sub_items (id, dish_id, name, description, dietary_tags) \
         VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(dish_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(encode_tags(&data.dietary_tags)?)
    .fetch_one(executor)
    .await?;
    Ok(item)
}

pub async fn update<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    data: &SubItemUpdate,
) -> RepoResult<Option<SubItem>> {
    let tags = data.dietary_tags.as_deref().map(encode_tags).transpose()?;
    let item = sqlx::query_as::<_, SubItem>(&format!(
        "UPDATE sub_items SET \
            name = COALESCE(?, name), \
            description = COALESCE(?, description), \
            dietary_tags = COALESCE(?, dietary_tags) \
         WHERE id = ? RETURNING {COLUMNS}"
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(tags)
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(item)
}

pub async fn delete<'c>(executor: impl SqliteExecutor<'c>, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM sub_items WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
