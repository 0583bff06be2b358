//! Auth API
//!
//! Sign-up, sign-in, refresh and reset-password are public; sign-out and
//! session need a bearer token.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-up", post(handler::sign_up))
        .route("/api/auth/sign-in", post(handler::sign_in))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/reset-password", post(handler::reset_password))
        .route("/api/auth/sign-out", post(handler::sign_out))
        .route("/api/auth/session", get(handler::session))
}
