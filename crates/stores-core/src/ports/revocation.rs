//! Token revocation store

use crate::Result;
use async_trait::async_trait;

/// Append-only set of revoked token identifiers (jti)
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `jti` as permanently revoked
    async fn revoke(&self, jti: &str) -> Result<()>;

    /// Whether `jti` has been revoked
    async fn is_revoked(&self, jti: &str) -> Result<bool>;
}
