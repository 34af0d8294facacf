//! Database repositories
//!
//! Provides the credential-store abstraction and its implementations.

pub mod memory;
pub mod users;

pub use memory::MemoryUserStore;
pub use users::{NewUser, PgUserStore, UserPatch, UserRecord, UserStore};
