//! BlackBoard Shared Library
//!
//! Request/response types and input validation shared by the backend
//! and any future clients of the BlackBoard API.

pub mod types;
pub mod validation;

pub use types::*;
