//! Business logic services
//!
//! Session orchestration lives here; entity CRUD goes through the
//! generic resource handlers instead.

pub mod session;

pub use session::{SessionService, SessionTokens};
