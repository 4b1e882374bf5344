//! Authentication layer: token signing/verification, password hashing, and
//! the per-request verification gate.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{AppState, AuthUser};
pub use token::{Claims, TokenCodec};

/// Name of the cookie carrying the bearer credential.
pub const AUTH_COOKIE: &str = "authorization";

/// Scheme prefix inside the cookie value: `Bearer <token>`.
pub const AUTH_SCHEME: &str = "Bearer";
