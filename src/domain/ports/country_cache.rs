//! Country Cache Port
//!
//! Defines the interface for caching resolved country codes per client host.

use crate::domain::value_objects::CountryCode;
use async_trait::async_trait;

/// Cache-layer failure.
///
/// The access gate never treats these as fatal: a failed read counts as a
/// miss and a failed write is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache entry of {size} bytes exceeds the {limit} byte entry limit")]
    EntryTooLarge { size: u64, limit: u64 },
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Fixed-capacity store mapping a client host to its country code.
///
/// Entries carry their own time-to-live, set at write time. Eviction and
/// expiry happen inside the implementation.
#[async_trait]
pub trait CountryCache: Send + Sync {
    /// Look up the cached code for a host. `Ok(None)` is a plain miss.
    async fn get(&self, key: &str) -> Result<Option<CountryCode>, CacheError>;

    /// Store a code for a host. A `ttl_secs` of zero never expires.
    async fn set(&self, key: &str, code: &CountryCode, ttl_secs: u64) -> Result<(), CacheError>;
}
