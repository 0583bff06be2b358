//! Server configuration

use crate::BoxError;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Menu server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP listen port
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    /// Access token lifetime
    pub jwt_expiration_minutes: i64,
    /// Refresh token lifetime
    pub refresh_token_days: i64,
    pub log_level: String,
    pub log_json: bool,
    /// Directory for rolling log files; console only when unset
    pub log_dir: Option<String>,
    /// `*` or a single allowed origin
    pub cors_allow_origin: String,
    /// Account created or promoted to admin at startup
    pub admin_email: Option<String>,
    /// Password for a bootstrap admin that does not exist yet
    pub admin_password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set, non-empty and long enough
    /// outside development.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                tracing::warn!("{name} not set, using development placeholder");
                format!("dev-{name}-not-for-production-use-only")
            }
        };
        if val.len() < MIN_JWT_SECRET_LEN && environment != "development" {
            return Err(format!(
                "{name} must be at least {MIN_JWT_SECRET_LEN} characters in {environment} environment"
            )
            .into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: parse_env("HTTP_PORT", 8080),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:menu.db".into()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: parse_env("JWT_EXPIRATION_MINUTES", 60),
            refresh_token_days: parse_env("REFRESH_TOKEN_DAYS", 30),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: parse_env("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").unwrap_or_else(|_| "*".into()),
            admin_email: non_empty_env("ADMIN_EMAIL"),
            admin_password: non_empty_env("ADMIN_PASSWORD"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Bootstrap admin credentials, when both are configured
    pub fn admin_bootstrap(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }

    /// Configuration for tests: in-memory database, fixed secret
    pub fn for_tests() -> Self {
        Self {
            environment: "development".into(),
            http_port: 0,
            database_url: "sqlite::memory:".into(),
            jwt_secret: "test-secret-for-menu-server-0123456789".into(),
            jwt_expiration_minutes: 60,
            refresh_token_days: 30,
            log_level: "warn".into(),
            log_json: false,
            log_dir: None,
            cors_allow_origin: "*".into(),
            admin_email: None,
            admin_password: None,
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_rejects_missing_outside_development() {
        let err = Config::require_secret("MENU_SERVER_TEST_UNSET_SECRET", "production");
        assert!(err.is_err());

        let dev = Config::require_secret("MENU_SERVER_TEST_UNSET_SECRET", "development").unwrap();
        assert!(dev.starts_with("dev-"));
    }

    #[test]
    fn test_admin_bootstrap_needs_email_and_password() {
        let mut config = Config::for_tests();
        assert_eq!(config.admin_bootstrap(), None);

        config.admin_email = Some("owner@example.com".into());
        assert_eq!(config.admin_bootstrap(), None);

        config.admin_password = Some("password1".into());
        assert_eq!(config.admin_bootstrap(), Some(("owner@example.com", "password1")));
    }

    #[test]
    fn test_parse_env_falls_back_to_default() {
        assert_eq!(parse_env("MENU_SERVER_TEST_UNSET_PORT", 8080u16), 8080);
    }
}
