//! Account administration Handlers

use axum::{
    Json,
    body::to_bytes,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use shared::client::{AdminUsersRequest, CreatedUser, SuccessResponse};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Role;

use crate::auth::{CurrentUser, JwtService, authenticate, ensure_admin};
use crate::db;
use crate::security_log;
use crate::services::accounts;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Bearer token, or the bare header value when the prefix is missing
fn bearer(req: &Request) -> AppResult<String> {
    let Some(header) = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!(WARN, "auth_missing", uri = req.uri().to_string());
        return Err(AppError::unauthorized());
    };

    let token = JwtService::extract_from_header(header).unwrap_or(header.trim());
    Ok(token.to_string())
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/admin-users - create or delete an account
pub async fn admin_users(State(state): State<AppState>, req: Request) -> AppResult<Response> {
    let uri = req.uri().to_string();
    let token = bearer(&req)?;
    let admin = authenticate(&state, &token, &uri).await?;
    ensure_admin(&state.pool, &admin).await?;

    let body = to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::invalid_request(format!("Unreadable body: {e}")))?;
    let payload: AdminUsersRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::invalid_request(format!("Invalid JSON body: {e}")))?;

    match payload.action.as_deref() {
        Some("create") => create(&state, &admin, payload).await,
        Some("delete") => delete(&state, &admin, payload).await,
        _ => Err(AppError::new(ErrorCode::UnknownAction)),
    }
}

async fn create(
    state: &AppState,
    admin: &CurrentUser,
    payload: AdminUsersRequest,
) -> AppResult<Response> {
    let (Some(email), Some(password), Some(role)) = (
        present(payload.email),
        present(payload.password),
        present(payload.role),
    ) else {
        return Err(AppError::required_field("Missing required fields"));
    };

    let role = Role::parse(role.trim())
        .ok_or_else(|| AppError::new(ErrorCode::InvalidRole).with_detail("role", role.clone()))?;

    let profile = accounts::register(&state.pool, &email, &password, role).await?;
    security_log!(
        INFO,
        "user_created",
        admin_id = admin.id.as_str(),
        user_id = profile.id.as_str(),
        user_role = role.as_str()
    );

    Ok(Json(CreatedUser {
        user_id: profile.id.clone(),
        profile,
    })
    .into_response())
}

async fn delete(
    state: &AppState,
    admin: &CurrentUser,
    payload: AdminUsersRequest,
) -> AppResult<Response> {
    let Some(user_id) = present(payload.user_id) else {
        return Err(AppError::required_field("Missing userId"));
    };

    if user_id == admin.id {
        security_log!(WARN, "self_delete_attempt", admin_id = admin.id.as_str());
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    if !db::users::delete(&state.pool, &user_id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).with_detail("userId", user_id));
    }

    security_log!(
        INFO,
        "user_deleted",
        admin_id = admin.id.as_str(),
        user_id = user_id.as_str()
    );
    Ok(Json(SuccessResponse::ok()).into_response())
}
