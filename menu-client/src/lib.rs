//! Typed HTTP client for menu-server
//!
//! Sessions are explicit: sign in to get an [`AuthContext`], pass it to each
//! call, and consume it with [`MenuClient::sign_out`].

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use auth::AuthContext;
pub use client::{ExportedMenu, MenuClient};
pub use config::{ClientConfig, DEFAULT_REFRESH_LEEWAY_SECS};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
