//! `CurrentUser` and `AdminUser` extractors

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtService, ensure_admin, middleware::authenticate};
use crate::security_log;
use crate::state::AppState;

/// Reuses the user injected by [`require_auth`](super::require_auth), or
/// validates the bearer token itself when the middleware did not run.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!(WARN, "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        let user = authenticate(state, token, &parts.uri.to_string()).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Caller whose stored profile carries the admin role
///
/// Place it before any body extractor so that 403 wins over body errors.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        ensure_admin(&state.pool, &user).await?;
        Ok(AdminUser(user))
    }
}
