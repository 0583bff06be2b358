//! Shared types for the catering menu builder
//!
//! Domain models, bucket rules, cuisine mapping and the unified error
//! system used by both `menu-server` and `menu-client`.

pub mod bucket;
pub mod client;
pub mod cuisine;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use bucket::{Bucket, BucketRules};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
