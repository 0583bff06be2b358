//! Admin console API - every handler takes an [`AdminUser`](crate::auth::AdminUser)

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/profiles", get(handler::list_profiles))
        .route("/api/admin/profiles/{id}/role", put(handler::set_role))
        .route(
            "/api/admin/profiles/{id}/password-reset",
            post(handler::password_reset),
        )
        .route("/api/admin/banners/{cuisine}", put(handler::set_banner))
}
