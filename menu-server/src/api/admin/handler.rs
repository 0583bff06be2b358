//! Admin console API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{BannerUpdate, PasswordResetIssued, SuccessResponse};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Profile, RoleUpdate};

use crate::api::validate;
use crate::auth::AdminUser;
use crate::db;
use crate::security_log;
use crate::services::accounts;
use crate::state::AppState;

/// GET /api/admin/profiles - all profiles sorted by email
pub async fn list_profiles(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<Vec<Profile>>> {
    let profiles = db::profiles::list(&state.pool).await?;
    Ok(Json(profiles))
}

/// PUT /api/admin/profiles/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Profile>> {
    let profile = db::profiles::set_role(&state.pool, &id, payload.role)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("userId", id.clone()))?;

    security_log!(
        INFO,
        "role_changed",
        admin_id = admin.id.as_str(),
        user_id = id.as_str(),
        user_role = payload.role.as_str()
    );
    Ok(Json(profile))
}

/// POST /api/admin/profiles/{id}/password-reset - mail a reset code to the user
pub async fn password_reset(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<PasswordResetIssued>> {
    let issued = accounts::issue_password_reset(&state, &id).await?;
    security_log!(
        INFO,
        "password_reset_issued",
        admin_id = admin.id.as_str(),
        user_id = id.as_str()
    );
    Ok(Json(issued))
}

/// PUT /api/admin/banners/{cuisine} - banner override for a cuisine label
pub async fn set_banner(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(cuisine): Path<String>,
    Json(payload): Json<BannerUpdate>,
) -> AppResult<Json<SuccessResponse>> {
    validate(&payload)?;
    if cuisine.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CuisineRequired));
    }

    db::banners::upsert(&state.pool, cuisine.trim(), &payload.image_url).await?;
    tracing::info!(cuisine = %cuisine, by = %admin.id, "Banner updated");
    Ok(Json(SuccessResponse::ok()))
}
