//! Authentication middleware
//!
//! Axum middleware for JWT authentication and admin authorization

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::db;
use crate::security_log;
use crate::state::AppState;

/// Routes reachable without a bearer token.
///
/// `/api/admin-users` authenticates inside its handler so that a wrong
/// method is answered with 405 before any credential check.
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/sign-up",
    "/api/auth/sign-in",
    "/api/auth/refresh",
    "/api/auth/reset-password",
    "/api/admin-users",
];

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>` and
/// inserts [`CurrentUser`] into the request extensions.
///
/// Skipped for `OPTIONS` (CORS preflight), non `/api/` paths and
/// [`PUBLIC_API_ROUTES`].
///
/// | Failure | Status |
/// |---------|--------|
/// | no Authorization header | 401 NotAuthenticated |
/// | expired token | 401 TokenExpired |
/// | any other invalid token | 401 TokenInvalid |
/// | account deleted since the token was issued | 401 NotAuthenticated |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let uri = req.uri().to_string();
    let user = authenticate(&state, token, &uri).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Validate a bare token and check its account still exists, logging
/// failures to the security target
pub async fn authenticate(
    state: &AppState,
    token: &str,
    uri: &str,
) -> Result<CurrentUser, AppError> {
    let user = match state.jwt.validate_token(token) {
        Ok(claims) => CurrentUser::from(claims),
        Err(e) => {
            security_log!(WARN, "auth_failed", error = e.to_string(), uri = uri);
            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    if !db::users::exists(&state.pool, &user.id).await? {
        security_log!(WARN, "auth_deleted_account", user_id = user.id.as_str(), uri = uri);
        return Err(AppError::unauthorized());
    }
    Ok(user)
}

/// Role recorded in the user's profile; a missing profile or role reads as staff
pub async fn stored_role(pool: &SqlitePool, user_id: &str) -> Result<Role, AppError> {
    let profile = db::profiles::find_by_id(pool, user_id).await?;
    Ok(profile.map(|p| p.role).unwrap_or_default())
}

/// Require the admin role, read from the stored profile
///
/// Non-admins get 403 AdminRequired and a security log entry.
pub async fn ensure_admin(pool: &SqlitePool, user: &CurrentUser) -> Result<(), AppError> {
    let role = stored_role(pool, &user.id).await?;
    if !role.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            user_id = user.id.as_str(),
            email = user.email.as_str(),
            user_role = role.as_str()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(())
}
