//! Menu Server - catering menu builder backend
//!
//! # Architecture
//!
//! - **Library** (`db::dishes`, `db::sub_items`): dishes and their sub-items in SQLite
//! - **Assembly** (`services::assembly`): turns event preferences into a menu
//! - **History** (`db::history`): archived menus with event metadata
//! - **Editor** (`editor`): per-user draft sessions with deferred library writes
//! - **Export** (`export`): PDF rendering with a printable HTML fallback
//! - **Auth** (`auth`, `services::accounts`): JWT access tokens, refresh
//!   rotation, stored-role authorization
//!
//! # Layout
//!
//! ```text
//! menu-server/src/
//! ├── api/        # HTTP routes and handlers
//! ├── auth/       # JWT, password hashing, middleware
//! ├── db/         # SQLite storage, one module per table
//! ├── editor/     # edit sessions and pending operations
//! ├── export/     # PDF and print rendering
//! └── services/   # assembly, library queries, accounts
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod export;
pub mod logger;
pub mod mail;
pub mod services;
pub mod state;

pub use api::{build_app, build_router};
pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use state::AppState;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

/// Boxed error for infrastructure failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
