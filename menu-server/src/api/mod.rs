//! HTTP API
//!
//! Each resource module exposes `router()`; [`build_router`] merges them and
//! [`build_app`] adds middleware and state.

use axum::Router;
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, AppResult};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use validator::Validate;

use crate::auth::require_auth;
use crate::config::Config;
use crate::state::AppState;

pub mod admin;
pub mod admin_users;
pub mod auth;
pub mod dishes;
pub mod editor;
pub mod health;
pub mod history;
pub mod menus;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        // Health - public
        .merge(health::router())
        // Auth - sign-up/sign-in/refresh/reset are public
        .merge(auth::router())
        // Library - reads for any user, writes for admins
        .merge(dishes::router())
        // Menu generation
        .merge(menus::router())
        // History
        .merge(history::router())
        // Edit sessions
        .merge(editor::router())
        // Admin console
        .merge(admin::router())
        // Account administration, authenticates in the handler
        .merge(admin_users::router())
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow_origin == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(&config.cors_allow_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(origin = %config.cors_allow_origin, "Invalid CORS origin, allowing any");
            CorsLayer::permissive()
        }
    }
}

/// Build the fully configured application
///
/// Used by the HTTP server and by in-process tests.
pub fn build_app(state: &AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // CORS - handle cross-origin requests
        .layer(cors_layer(&state.config))
        // Trace - request spans at INFO level
        .layer(TraceLayer::new_for_http())
        // Request ID - generate and echo back
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        // JWT authentication - injects CurrentUser before routes run
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state.clone())
}

/// Run `validator` rules on a payload, reporting the failing fields
pub(crate) fn validate<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        AppError::validation(errors.to_string()).with_detail("fields", fields)
    })
}
