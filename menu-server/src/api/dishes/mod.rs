//! Dish library API
//!
//! Any signed-in user may browse; mutations take an [`AdminUser`](crate::auth::AdminUser).

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cuisines", get(handler::list_cuisines))
        .route("/api/dishes", get(handler::list).post(handler::create))
        .route(
            "/api/dishes/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/dishes/{id}/sub-items",
            get(handler::list_sub_items).post(handler::create_sub_item),
        )
        .route(
            "/api/sub-items/{id}",
            put(handler::update_sub_item).delete(handler::delete_sub_item),
        )
}
