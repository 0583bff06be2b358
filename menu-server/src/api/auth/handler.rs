//! Auth API Handlers

use axum::{Json, extract::State};
use shared::client::{AuthSession, Credentials, RefreshRequest, ResetPasswordRequest, SuccessResponse};
use shared::error::AppResult;
use shared::models::{Profile, Role};

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::db;
use crate::services::accounts;
use crate::state::AppState;

/// POST /api/auth/sign-up - create a staff account and sign it in
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<AuthSession>> {
    validate(&req)?;
    let profile = accounts::register(&state.pool, &req.email, &req.password, Role::Staff).await?;
    let session = accounts::issue_session(&state, &profile.id, &profile.email).await?;
    Ok(Json(session))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<AuthSession>> {
    let session = accounts::sign_in(&state, &req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/auth/refresh - rotate the refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = accounts::refresh(&state, &req.refresh_token).await?;
    Ok(Json(session))
}

/// POST /api/auth/reset-password - consume an emailed reset code
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<SuccessResponse>> {
    accounts::reset_password(&state.pool, &req).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/auth/sign-out - revoke every refresh token of the caller
pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<SuccessResponse>> {
    db::refresh_tokens::revoke_all(&state.pool, &user.id).await?;
    tracing::info!(user_id = %user.id, "Signed out");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/auth/session - caller profile with the stored role
pub async fn session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let profile = accounts::profile_of(&state.pool, &user.id, &user.email).await?;
    Ok(Json(profile))
}
