//! Shared application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::BoxError;
use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;
use crate::db;
use crate::editor::SessionStore;
use crate::error::ServiceError;
use crate::mail::{LogMailer, Mailer};
use crate::services::accounts;

/// State handed to every handler; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtService>,
    /// Edit sessions, one per user
    pub sessions: Arc<SessionStore>,
    /// Delivery of password reset codes
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let jwt = JwtService::with_config(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_minutes,
        ));
        Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            sessions: Arc::new(SessionStore::default()),
            mailer,
        }
    }

    /// Connect the database (running migrations), build the state and
    /// apply the configured bootstrap admin
    pub async fn initialize(config: Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;
        tracing::info!(database_url = %config.database_url, "Database ready");

        let state = Self::new(pool, config, Arc::new(LogMailer));
        if let Some((email, password)) = state.config.admin_bootstrap() {
            accounts::bootstrap_admin(&state.pool, email, password)
                .await
                .map_err(|e| -> BoxError {
                    match e {
                        ServiceError::Db(e) => e,
                        ServiceError::App(e) => Box::new(e),
                    }
                })?;
        }
        Ok(state)
    }
}
