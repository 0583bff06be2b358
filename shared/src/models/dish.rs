//! Dish Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::bucket::Bucket;

/// Dish entity (library row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Stored as a JSON array
    #[cfg_attr(feature = "db", sqlx(json))]
    pub dietary_tags: Vec<String>,
    pub image_url: Option<String>,
    /// Free-text category, bucketed by keyword rules
    pub category: String,
    /// Stored cuisine (not the UI label)
    pub cuisine: String,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub sub_items: Vec<SubItem>,
}

/// Optional variant attached to a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SubItem {
    pub id: String,
    pub dish_id: String,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub dietary_tags: Vec<String>,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    #[validate(length(min = 1, max = 200, message = "Dish name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub cuisine: String,
}

/// Update dish payload
///
/// `cuisine` relocates the dish; it is applied only when it differs from
/// the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    #[validate(length(min = 1, max = 200, message = "Dish name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub dietary_tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
}

/// Create sub-item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubItemCreate {
    #[validate(length(min = 1, max = 200, message = "Sub-item name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

/// Update sub-item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubItemUpdate {
    #[validate(length(min = 1, max = 200, message = "Sub-item name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub dietary_tags: Option<Vec<String>>,
}

/// Library dishes of one bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishGroup {
    pub bucket: Bucket,
    pub title: String,
    pub dishes: Vec<Dish>,
}

/// Library listing query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishQuery {
    /// UI cuisine label; absent selects everything
    pub cuisine: Option<String>,
    /// Case-insensitive search over name and description
    pub q: Option<String>,
}
