//! Menu history API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::SuccessResponse;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{HistoryCreate, HistoryRecord};

use crate::auth::{CurrentUser, stored_role};
use crate::db::history;
use crate::security_log;
use crate::state::AppState;

fn history_not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::HistoryNotFound).with_detail("id", id)
}

/// GET /api/history - all records, newest first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<HistoryRecord>>> {
    let records = history::list(&state.pool).await?;
    Ok(Json(records))
}

/// POST /api/history - archive a menu for the caller
pub async fn save(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<HistoryCreate>,
) -> AppResult<Json<HistoryRecord>> {
    let record = history::create(&state.pool, &user.id, payload).await?;
    tracing::info!(history_id = %record.id, user_id = %user.id, "Menu saved to history");
    Ok(Json(record))
}

/// GET /api/history/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<HistoryRecord>> {
    let record = history::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| history_not_found(&id))?;
    Ok(Json(record))
}

/// DELETE /api/history/{id} - owner or admin
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    let record = history::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| history_not_found(&id))?;

    if record.user_id != user.id && !stored_role(&state.pool, &user.id).await?.is_admin() {
        security_log!(
            WARN,
            "history_delete_denied",
            user_id = user.id.as_str(),
            history_id = id.as_str()
        );
        return Err(AppError::forbidden("Only the owner or an admin can delete this menu"));
    }

    if !history::delete(&state.pool, &id).await? {
        return Err(history_not_found(&id));
    }
    tracing::info!(history_id = %id, by = %user.id, "History record deleted");
    Ok(Json(SuccessResponse::ok()))
}
