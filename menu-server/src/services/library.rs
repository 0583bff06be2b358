//! Dish library queries shared by the browser, assembly and the editor

use shared::bucket::{Bucket, BucketRules};
use shared::cuisine::{CuisineFilter, resolve_label};
use shared::models::{Dish, DishGroup};
use sqlx::SqlitePool;

use crate::db::{self, RepoResult};

/// Dishes matching `filter`, each with its sub-items
pub async fn load(
    pool: &SqlitePool,
    filter: &CuisineFilter,
    search: Option<&str>,
) -> RepoResult<Vec<Dish>> {
    let mut dishes = db::dishes::find_by_filter(pool, filter, search).await?;
    db::sub_items::attach_to(pool, &mut dishes).await?;
    Ok(dishes)
}

/// Group dishes by bucket in category order; empty buckets are left out
pub fn group(dishes: Vec<Dish>) -> Vec<DishGroup> {
    let rules = BucketRules::category();
    let mut groups: Vec<DishGroup> = Bucket::ALL
        .iter()
        .map(|bucket| DishGroup {
            bucket: *bucket,
            title: bucket.title().to_string(),
            dishes: Vec::new(),
        })
        .collect();

    for dish in dishes {
        let bucket = rules.classify(&dish.category);
        if let Some(group) = groups.iter_mut().find(|g| g.bucket == bucket) {
            group.dishes.push(dish);
        }
    }

    groups.retain(|g| !g.dishes.is_empty());
    groups
}

/// Library view for one cuisine label, grouped by bucket
pub async fn grouped(
    pool: &SqlitePool,
    cuisine_label: &str,
    search: Option<&str>,
) -> RepoResult<Vec<DishGroup>> {
    let dishes = load(pool, &resolve_label(cuisine_label), search).await?;
    Ok(group(dishes))
}

/// Library dishes of a cuisine label that fall into `bucket`
pub async fn in_bucket(
    pool: &SqlitePool,
    cuisine_label: &str,
    bucket: Bucket,
) -> RepoResult<Vec<Dish>> {
    let rules = BucketRules::category();
    let dishes = load(pool, &resolve_label(cuisine_label), None).await?;
    Ok(dishes
        .into_iter()
        .filter(|d| rules.classify(&d.category) == bucket)
        .collect())
}
