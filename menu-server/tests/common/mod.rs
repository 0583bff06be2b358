#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use menu_server::mail::Mailer;
use menu_server::services::accounts;
use menu_server::{AppState, BoxError, Config, build_app, db};
use serde_json::Value;
use shared::client::AuthSession;
use shared::models::Role;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

/// Captures reset codes instead of sending them
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset_code(
        &self,
        to: &str,
        code: &str,
        _valid_minutes: i64,
    ) -> Result<(), BoxError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    /// `code` of an `ApiResponse` error body
    pub fn error_code(&self) -> Option<u64> {
        self.json().get("code").and_then(Value::as_u64)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::for_tests();
        let pool = db::connect(&config.database_url).await.unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(pool, config, mailer.clone());
        let router = build_app(&state);
        Self {
            state,
            router,
            mailer,
        }
    }

    /// Create an account with `role` and sign it in
    pub async fn account(&self, email: &str, role: Role) -> AuthSession {
        let profile = accounts::register(&self.state.pool, email, PASSWORD, role)
            .await
            .unwrap();
        accounts::issue_session(&self.state, &profile.id, &profile.email)
            .await
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        Reply {
            status,
            headers,
            bytes,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Reply {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Reply {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }
}
