//! Authentication and authorization
//!
//! - [`JwtService`] issues and validates access tokens
//! - [`CurrentUser`] is the per-request caller, injected by [`require_auth`]
//! - [`AdminUser`] and [`ensure_admin`] check the role recorded in the
//!   caller's profile, never the token claim

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::{authenticate, ensure_admin, require_auth, stored_role};
pub use password::{generate_code, hash_password, verify_password};
