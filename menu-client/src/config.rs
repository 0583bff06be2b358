//! Client configuration

/// Refresh the access token when it expires within this many seconds
pub const DEFAULT_REFRESH_LEEWAY_SECS: i64 = 60;

/// Connection settings for a menu-server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    pub refresh_leeway_secs: i64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            refresh_leeway_secs: DEFAULT_REFRESH_LEEWAY_SECS,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}
