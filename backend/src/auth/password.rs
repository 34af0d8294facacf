//! Password hashing using bcrypt
//!
//! Provides salted one-way hashing and verification with a fixed cost
//! factor. The cost is not configurable at call sites.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. The async variants run the
//! work on the blocking thread pool so it never stalls the runtime.

use anyhow::Result;

/// Fixed bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking operation)
    ///
    /// # Performance Note
    /// This is CPU-intensive. For async contexts, use `hash_async`.
    pub fn hash(password: &str) -> Result<String> {
        bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on the blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// Comparison goes through the library's own verify routine; the
    /// digest is never compared byte-wise here.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| anyhow::anyhow!("Failed to verify password: {}", e))
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}
