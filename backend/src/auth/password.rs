//! Password hashing using bcrypt
//!
//! Provides salted, one-way password digests and their verification.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. The async variants run the work
//! on the blocking thread pool so concurrent requests are not stalled.

use anyhow::Result;
use keep_reading_shared::validation::MAX_PASSWORD_BYTES;
use tracing::warn;

/// Work factor used for stored digests
pub const DEFAULT_COST: u32 = 10;

/// Password hashing service
///
/// Each digest embeds its own random salt and cost, so equal passwords
/// hash to different digests and verification needs no extra state.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialHasher {
    /// Create a hasher with an explicit work factor (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password (blocking operation)
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
    /// truncated.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            anyhow::bail!("Password exceeds {} bytes", MAX_PASSWORD_BYTES);
        }
        bcrypt::hash(password, self.cost).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a digest (blocking operation)
    ///
    /// A digest that cannot be parsed never verifies, and neither does a
    /// password longer than [`MAX_PASSWORD_BYTES`].
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(password, digest) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "Rejecting malformed password digest");
                false
            }
        }
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(&self, password: String, digest: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
