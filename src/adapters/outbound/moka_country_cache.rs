//! Moka Country Cache
//!
//! Implements CountryCache with an in-memory Moka cache bounded by total
//! entry size. Every entry carries its own time-to-live.

use crate::domain::ports::{CacheError, CountryCache};
use crate::domain::value_objects::CountryCode;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

/// Entries larger than this fraction of the capacity are refused.
const ENTRY_LIMIT_DIVISOR: u64 = 1024;

#[derive(Debug, Clone)]
struct CachedCountry {
    code: CountryCode,
    ttl: Option<Duration>,
}

/// Expiry policy reading the TTL stored alongside each value.
struct PerEntryTtl;

impl Expiry<String, CachedCountry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedCountry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedCountry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

fn entry_weight(key: &str, code: &CountryCode) -> u64 {
    (key.len() + code.as_str().len()) as u64
}

/// Moka-backed country cache.
///
/// Capacity is expressed in bytes of key plus value, so the configured
/// size bounds memory rather than entry count.
#[derive(Clone)]
pub struct MokaCountryCache {
    cache: Cache<String, CachedCountry>,
    entry_limit: u64,
}

impl MokaCountryCache {
    /// Create a cache holding at most `capacity_bytes` of keys and values.
    pub fn with_capacity(capacity_bytes: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity_bytes)
            .weigher(|key: &String, value: &CachedCountry| -> u32 {
                entry_weight(key, &value.code).try_into().unwrap_or(u32::MAX)
            })
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            entry_limit: (capacity_bytes / ENTRY_LIMIT_DIVISOR).max(1),
        }
    }

    /// Create a cache sized in megabytes.
    pub fn with_size_mb(size_mb: u64) -> Self {
        Self::with_capacity(size_mb.saturating_mul(1024 * 1024))
    }
}

#[async_trait]
impl CountryCache for MokaCountryCache {
    async fn get(&self, key: &str) -> Result<Option<CountryCode>, CacheError> {
        Ok(self.cache.get(key).await.map(|entry| entry.code))
    }

    async fn set(&self, key: &str, code: &CountryCode, ttl_secs: u64) -> Result<(), CacheError> {
        let size = entry_weight(key, code);
        if size > self.entry_limit {
            return Err(CacheError::EntryTooLarge {
                size,
                limit: self.entry_limit,
            });
        }

        let ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));
        self.cache
            .insert(
                key.to_string(),
                CachedCountry {
                    code: code.clone(),
                    ttl,
                },
            )
            .await;
        tracing::trace!(key, code = %code, ttl_secs, "cached country code");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MokaCountryCache {
        MokaCountryCache::with_size_mb(1)
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        assert_eq!(cache().get("10.0.0.1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = cache();
        cache
            .set("10.0.0.1", &CountryCode::from("CY"), 10)
            .await
            .unwrap();

        assert_eq!(
            cache.get("10.0.0.1").await.unwrap(),
            Some(CountryCode::from("CY"))
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = cache();
        cache.set("10.0.0.1", &CountryCode::from("CY"), 10).await.unwrap();
        cache.set("10.0.0.1", &CountryCode::from("US"), 10).await.unwrap();

        assert_eq!(
            cache.get("10.0.0.1").await.unwrap(),
            Some(CountryCode::from("US"))
        );
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = cache();
        cache.set("10.0.0.1", &CountryCode::from("CY"), 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(cache.get("10.0.0.1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttls_are_per_entry() {
        let cache = cache();
        cache.set("short", &CountryCode::from("CY"), 1).await.unwrap();
        cache.set("long", &CountryCode::from("US"), 60).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(
            cache.get("long").await.unwrap(),
            Some(CountryCode::from("US"))
        );
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let cache = cache();
        cache.set("10.0.0.1", &CountryCode::from("CY"), 0).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert!(cache.get("10.0.0.1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_oversized_entry_is_refused() {
        let cache = MokaCountryCache::with_capacity(16 * 1024);
        let huge = CountryCode::from("X".repeat(64).as_str());

        let result = cache.set("10.0.0.1", &huge, 10).await;

        assert_eq!(
            result,
            Err(CacheError::EntryTooLarge {
                size: 72,
                limit: 16
            })
        );
        assert_eq!(cache.get("10.0.0.1").await.unwrap(), None);
    }
}
