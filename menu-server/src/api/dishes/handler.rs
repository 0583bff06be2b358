//! Dish library API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::SuccessResponse;
use shared::cuisine::ANY_MIX;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Dish, DishCreate, DishGroup, DishQuery, DishUpdate, SubItem, SubItemCreate, SubItemUpdate,
};
use shared::util::new_id;

use crate::api::validate;
use crate::auth::AdminUser;
use crate::db::{dishes, sub_items};
use crate::services::library;
use crate::state::AppState;

fn dish_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::DishNotFound).with_detail("id", id)
}

fn sub_item_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::SubItemNotFound).with_detail("id", id)
}

/// GET /api/cuisines - distinct stored cuisines
pub async fn list_cuisines(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let cuisines = dishes::list_cuisines(&state.pool).await?;
    Ok(Json(cuisines))
}

/// GET /api/dishes?cuisine=&q= - library grouped by bucket
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DishQuery>,
) -> AppResult<Json<Vec<DishGroup>>> {
    let label = query.cuisine.as_deref().unwrap_or(ANY_MIX);
    let groups = library::grouped(&state.pool, label, query.q.as_deref()).await?;
    Ok(Json(groups))
}

/// GET /api/dishes/{id} - one dish with its sub-items
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Dish>> {
    let mut dish = dishes::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| dish_not_found(&id))?;
    dish.sub_items = sub_items::find_by_dish(&state.pool, &id).await?;
    Ok(Json(dish))
}

/// POST /api/dishes - create a dish under an explicit cuisine and category
pub async fn create(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate(&payload)?;
    if payload.cuisine.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CuisineRequired));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CategoryRequired));
    }

    let dish = dishes::create(&state.pool, &new_id(), &payload).await?;
    tracing::info!(dish_id = %dish.id, cuisine = %dish.cuisine, by = %admin.id, "Dish created");
    Ok(Json(dish))
}

/// PUT /api/dishes/{id} - update fields, relocating only on a real cuisine change
pub async fn update(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(mut payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    validate(&payload)?;

    let existing = dishes::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| dish_not_found(&id))?;

    match payload.cuisine.as_deref().map(str::trim) {
        Some("") => return Err(AppError::new(ErrorCode::CuisineRequired)),
        Some(cuisine) if cuisine == existing.cuisine => payload.cuisine = None,
        Some(cuisine) => {
            tracing::info!(dish_id = %id, from = %existing.cuisine, to = %cuisine, "Dish relocated");
        }
        None => {}
    }
    if payload
        .category
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(AppError::new(ErrorCode::CategoryRequired));
    }

    let mut dish = dishes::update(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| dish_not_found(&id))?;
    dish.sub_items = sub_items::find_by_dish(&state.pool, &id).await?;
    tracing::info!(dish_id = %id, by = %admin.id, "Dish updated");
    Ok(Json(dish))
}

/// DELETE /api/dishes/{id} - sub-items cascade
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    if !dishes::delete(&state.pool, &id).await? {
        return Err(dish_not_found(&id));
    }
    tracing::info!(dish_id = %id, by = %admin.id, "Dish deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/dishes/{id}/sub-items
pub async fn list_sub_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubItem>>> {
    if dishes::find_by_id(&state.pool, &id).await?.is_none() {
        return Err(dish_not_found(&id));
    }
    let items = sub_items::find_by_dish(&state.pool, &id).await?;
    Ok(Json(items))
}

/// POST /api/dishes/{id}/sub-items
pub async fn create_sub_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<SubItemCreate>,
) -> AppResult<Json<SubItem>> {
    validate(&payload)?;
    if dishes::find_by_id(&state.pool, &id).await?.is_none() {
        return Err(dish_not_found(&id));
    }
    let item = sub_items::create(&state.pool, &new_id(), &id, &payload).await?;
    Ok(Json(item))
}

/// PUT /api/sub-items/{id}
pub async fn update_sub_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<SubItemUpdate>,
) -> AppResult<Json<SubItem>> {
    validate(&payload)?;
    let item = sub_items::update(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| sub_item_not_found(&id))?;
    Ok(Json(item))
}

/// DELETE /api/sub-items/{id}
pub async fn delete_sub_item(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    if !sub_items::delete(&state.pool, &id).await? {
        return Err(sub_item_not_found(&id));
    }
    Ok(Json(SuccessResponse::ok()))
}
