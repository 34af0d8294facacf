//! Authentication module
//!
//! Provides JWT-based authentication with bcrypt password hashing, the
//! bearer-token gate and the shared API-key gate.

mod jwt;
mod middleware;
mod password;

pub use jwt::{AccessClaims, JwtService, RefreshClaims};
pub use middleware::{require_api_key, AuthUser, API_KEY_HEADER};
pub use password::PasswordService;
