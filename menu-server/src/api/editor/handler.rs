//! Edit session API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{
    AlternativesQuery, EditCommand, EditSessionView, OpenMenuRequest, SuccessResponse,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{HistoryRecord, MenuItem};

use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::editor::{self, EditSession};
use crate::export::ExportOutput;
use crate::state::AppState;

/// GET /api/editor - the caller's session
pub async fn current(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<EditSessionView>> {
    Ok(Json(state.sessions.view(&user.id)?))
}

/// DELETE /api/editor - discard the session and its pending writes
pub async fn close(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<SuccessResponse>> {
    state.sessions.close(&user.id)?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/editor/open - edit an unsaved menu
pub async fn open(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OpenMenuRequest>,
) -> AppResult<Json<EditSessionView>> {
    let view = state
        .sessions
        .open(&user.id, EditSession::open(req.menu, None))?;
    tracing::debug!(user_id = %user.id, "Edit session opened");
    Ok(Json(view))
}

/// POST /api/editor/open/{history_id} - edit an archived menu
pub async fn open_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(history_id): Path<String>,
) -> AppResult<Json<EditSessionView>> {
    let record = db::history::find_by_id(&state.pool, &history_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::HistoryNotFound).with_detail("id", history_id.clone())
        })?;
    let view = state
        .sessions
        .open(&user.id, EditSession::open(record.menu, Some(record.id)))?;
    tracing::debug!(user_id = %user.id, history_id = %history_id, "Edit session opened");
    Ok(Json(view))
}

/// POST /api/editor/edit - enter editing mode (admin)
pub async fn edit(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> AppResult<Json<EditSessionView>> {
    let view = state.sessions.with_mut(&user.id, |s| {
        s.begin_edit()?;
        Ok(s.view())
    })?;
    Ok(Json(view))
}

/// POST /api/editor/ops - apply one edit command to the draft (admin)
pub async fn apply(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(command): Json<EditCommand>,
) -> AppResult<Json<EditSessionView>> {
    let view = editor::apply(&state.pool, &state.sessions, &user.id, command).await?;
    Ok(Json(view))
}

/// GET /api/editor/alternatives?section=&item= - swap candidates
pub async fn alternatives(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<AlternativesQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items =
        editor::alternatives(&state.pool, &state.sessions, &user.id, query.section, query.item)
            .await?;
    Ok(Json(items))
}

/// POST /api/editor/save - commit pending library writes (admin)
pub async fn save(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> AppResult<Json<EditSessionView>> {
    let view = editor::save(&state.pool, &state.sessions, &user.id).await?;
    Ok(Json(view))
}

/// POST /api/editor/archive - write the draft to history
pub async fn archive(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<HistoryRecord>> {
    let record = editor::archive(&state.pool, &state.sessions, &user.id).await?;
    Ok(Json(record))
}

/// POST /api/editor/export - PDF download, or a print page when PDF fails
pub async fn export(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<ExportOutput> {
    editor::export(&state.sessions, &user.id)
}
