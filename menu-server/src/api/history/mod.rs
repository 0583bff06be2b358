//! Menu history API

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/history", get(handler::list).post(handler::save))
        .route(
            "/api/history/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
}
