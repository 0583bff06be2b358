//! Edit session API
//!
//! One session per user, held in memory. Entering `editing` needs the
//! admin role; the other calls act on the caller's own session.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/editor", get(handler::current).delete(handler::close))
        .route("/api/editor/open", post(handler::open))
        .route("/api/editor/open/{history_id}", post(handler::open_history))
        .route("/api/editor/edit", post(handler::edit))
        .route("/api/editor/save", post(handler::save))
        .route("/api/editor/archive", post(handler::archive))
        .route("/api/editor/ops", post(handler::apply))
        .route("/api/editor/alternatives", get(handler::alternatives))
        .route("/api/editor/export", post(handler::export))
}
