use async_trait::async_trait;
use std::time::Duration;

/// String-keyed blob storage with optional expiry.
///
/// Implementations never raise: a failed call reports `None` and the caller
/// treats it exactly like a missing record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored value, or `None` if it is absent, expired, or unreachable.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value`, replacing any previous one. `None` on failure.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Option<()>;

    /// Deletes `key` and returns how many records were removed. `None` on failure.
    async fn del(&self, key: &str) -> Option<u64>;
}
