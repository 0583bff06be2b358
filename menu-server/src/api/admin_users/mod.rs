//! Account administration endpoint
//!
//! `POST /api/admin-users` with `{action: "create" | "delete", ...}`. The
//! route is skipped by [`require_auth`](crate::auth::require_auth): the
//! handler authenticates itself so that checks run in a fixed order.
//!
//! | Check | Status |
//! |-------|--------|
//! | method other than POST | 405 |
//! | no Authorization header, bad token | 401 |
//! | stored role is not admin | 403 |
//! | body, fields, action | 400 / 404 |

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin-users", post(handler::admin_users))
}
