//! Dish library storage

use shared::cuisine::CuisineFilter;
use shared::models::{Dish, DishCreate, DishUpdate};
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

use super::{RepoResult, encode_tags};

const COLUMNS: &str =
    "id, name, description, dietary_tags, image_url, category, cuisine, created_at, updated_at";

/// Distinct non-empty stored cuisines, sorted
pub async fn list_cuisines(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT cuisine FROM dishes WHERE TRIM(cuisine) <> '' ORDER BY cuisine",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

/// `%`, `_` and `\` match themselves under `ESCAPE '\'`
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Dishes matching a cuisine filter and optional search text,
/// ordered by category then name. Sub-items are not loaded.
///
/// The search is a case-insensitive literal substring match on name or
/// description.
pub async fn find_by_filter(
    pool: &SqlitePool,
    filter: &CuisineFilter,
    search: Option<&str>,
) -> RepoResult<Vec<Dish>> {
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM dishes WHERE 1 = 1"));

    if let CuisineFilter::In(values) = filter {
        qb.push(" AND cuisine IN (");
        let mut sep = qb.separated(", ");
        for value in values {
            sep.push_bind(value.clone());
        }
        sep.push_unseparated(")");
    }

    let needle = search
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    // SQLite LOWER folds ASCII only; other needles are matched below
    if let Some(q) = needle.as_deref().filter(|q| q.is_ascii()) {
        let pattern = format!("%{}%", escape_like(q));
        qb.push(" AND (LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(description) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    qb.push(" ORDER BY category, name");

    let mut dishes = qb.build_query_as::<Dish>().fetch_all(pool).await?;
    if let Some(q) = needle.filter(|q| !q.is_ascii()) {
        dishes.retain(|d| contains_folded(&d.name, &q) || contains_folded(&d.description, &q));
    }
    Ok(dishes)
}

pub async fn find_by_id<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
) -> RepoResult<Option<Dish>> {
    let dish = sqlx::query_as::<_, Dish>(&format!("SELECT {COLUMNS} FROM dishes WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(dish)
}

/// Insert a dish with a caller-chosen id
pub async fn create<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    data: &DishCreate,
) -> RepoResult<Dish> {
    let now = now_millis();
    let dish = sqlx::query_as::<_, Dish>(&format!(
        "INSERT INTO dishes (id, name, description, dietary_tags, image_url, category, cuisine, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(encode_tags(&data.dietary_tags)?)
    .bind(&data.image_url)
    .bind(data.category.trim())
    .bind(data.cuisine.trim())
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(dish)
}

/// Apply the present fields of `data`. Returns `None` if the dish is gone.
pub async fn update<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    data: &DishUpdate,
) -> RepoResult<Option<Dish>> {
    let tags = data.dietary_tags.as_deref().map(encode_tags).transpose()?;
    let dish = sqlx::query_as::<_, Dish>(&format!(
        "UPDATE dishes SET \
            name = COALESCE(?, name), \
            description = COALESCE(?, description), \
            dietary_tags = COALESCE(?, dietary_tags), \
            image_url = COALESCE(?, image_url), \
            category = COALESCE(?, category), \
            cuisine = COALESCE(?, cuisine), \
            updated_at = ? \
         WHERE id = ? RETURNING {COLUMNS}"
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(tags)
    .bind(&data.image_url)
    .bind(data.category.as_deref().map(str::trim))
    .bind(data.cuisine.as_deref().map(str::trim))
    .bind(now_millis())
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(dish)
}

/// Delete a dish; its sub-items cascade. Returns whether a row was removed.
pub async fn delete<'c>(executor: impl SqliteExecutor<'c>, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM dishes WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
