//! Data models
//!
//! Shared between menu-server and menu-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUID strings. Wire format is camelCase.

pub mod dish;
pub mod history;
pub mod menu;
pub mod profile;

// Re-exports
pub use dish::*;
pub use history::*;
pub use menu::*;
pub use profile::*;
