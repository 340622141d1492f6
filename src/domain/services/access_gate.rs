//! Access Gate Domain Service
//!
//! Decides whether a client may proceed based on the country its address
//! resolves to. Country codes are read through a cache first and fetched
//! from the lookup service only on a miss.

use crate::domain::ports::{CountryCache, CountryLookup, LookupError};
use crate::domain::value_objects::{Allowlist, ClientAddress, CountryCode, Decision};
use std::sync::Arc;

/// Immutable gate settings, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    /// Countries allowed through the gate
    pub allowlist: Allowlist,
    /// Lifetime of a cached country code, in seconds
    pub ttl_secs: u64,
}

/// Reasons the gate could not reach a decision.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("malformed client address {0:?}")]
    MalformedAddress(String),
    #[error("cannot resolve country for {ip}: {source}")]
    LookupFailed {
        ip: String,
        #[source]
        source: LookupError,
    },
}

/// IP-to-country access gate.
///
/// Holds no per-request state; the cache is the only thing shared between
/// concurrent evaluations. Concurrent misses for the same host each fetch
/// independently.
pub struct AccessGate {
    cache: Arc<dyn CountryCache>,
    lookup: Arc<dyn CountryLookup>,
    config: GateConfig,
}

impl AccessGate {
    pub fn new(
        cache: Arc<dyn CountryCache>,
        lookup: Arc<dyn CountryLookup>,
        config: GateConfig,
    ) -> Self {
        Self {
            cache,
            lookup,
            config,
        }
    }

    /// Evaluate a raw transport address (`host:port` or `[host]:port`).
    pub async fn evaluate(&self, remote_addr: &str) -> Result<Decision, GateError> {
        let addr = ClientAddress::parse(remote_addr).ok_or_else(|| {
            tracing::error!(remote_addr, "client address format invalid");
            GateError::MalformedAddress(remote_addr.to_string())
        })?;

        let ip = addr.host();
        let code = self.resolve_country(ip).await.map_err(|source| {
            tracing::error!(ip, error = %source, "cannot find country for ip");
            GateError::LookupFailed {
                ip: ip.to_string(),
                source,
            }
        })?;

        Ok(self.decide(&code))
    }

    /// Cache-aside read of the country for a host.
    async fn resolve_country(&self, ip: &str) -> Result<CountryCode, LookupError> {
        match self.cache.get(ip).await {
            Ok(Some(code)) => {
                tracing::debug!(ip, code = %code, "country cache hit");
                return Ok(code);
            }
            Ok(None) => tracing::trace!(ip, "country cache miss"),
            Err(e) => tracing::warn!(ip, error = %e, "country cache read failed, treating as miss"),
        }

        let code = self.lookup.fetch(ip).await?;

        if let Err(e) = self.cache.set(ip, &code, self.config.ttl_secs).await {
            tracing::warn!(ip, error = %e, "failed to cache country code");
        }

        Ok(code)
    }

    fn decide(&self, code: &CountryCode) -> Decision {
        if self.config.allowlist.permits(code) {
            Decision::Allow
        } else {
            tracing::warn!(code = %code, "country code not allowed");
            Decision::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::CacheError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    // ===== Mock Implementations =====

    #[derive(Default)]
    struct MockCache {
        entries: Mutex<HashMap<String, CountryCode>>,
        fail_reads: bool,
        fail_writes: bool,
        gets: Mutex<Vec<String>>,
        sets: Mutex<Vec<(String, String, u64)>>,
    }

    impl MockCache {
        fn with_entry(key: &str, code: &str) -> Self {
            let cache = Self::default();
            cache
                .entries
                .lock()
                .unwrap()
                .insert(key.to_string(), CountryCode::from(code));
            cache
        }

        fn get_count(&self) -> usize {
            self.gets.lock().unwrap().len()
        }

        fn recorded_sets(&self) -> Vec<(String, String, u64)> {
            self.sets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CountryCache for MockCache {
        async fn get(&self, key: &str) -> Result<Option<CountryCode>, CacheError> {
            self.gets.lock().unwrap().push(key.to_string());
            if self.fail_reads {
                return Err(CacheError::Unavailable("nothing in cache".to_string()));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            code: &CountryCode,
            ttl_secs: u64,
        ) -> Result<(), CacheError> {
            self.sets
                .lock()
                .unwrap()
                .push((key.to_string(), code.to_string(), ttl_secs));
            if self.fail_writes {
                return Err(CacheError::Unavailable("write refused".to_string()));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), code.clone());
            Ok(())
        }
    }

    struct MockLookup {
        response: Result<CountryCode, LookupError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn returning(response: Result<&str, LookupError>) -> Self {
            Self {
                response: response.map(CountryCode::from),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CountryLookup for MockLookup {
        async fn fetch(&self, ip: &str) -> Result<CountryCode, LookupError> {
            self.calls.lock().unwrap().push(ip.to_string());
            self.response.clone()
        }
    }

    fn gate(cache: Arc<MockCache>, lookup: Arc<MockLookup>, allowed: &[&str], ttl: u64) -> AccessGate {
        AccessGate::new(
            cache,
            lookup,
            GateConfig {
                allowlist: Allowlist::new(allowed.iter().copied()),
                ttl_secs: ttl,
            },
        )
    }

    // ===== Scenario Tests =====

    #[tokio::test]
    async fn test_cached_code_not_allowed_denies() {
        let cache = Arc::new(MockCache::with_entry("127.0.0.1", "GB"));
        let lookup = Arc::new(MockLookup::returning(Ok("US")));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 10);

        let decision = gate.evaluate("127.0.0.1:1234").await.unwrap();

        assert_eq!(decision, Decision::Deny);
        assert_eq!(lookup.call_count(), 0);
        assert!(cache.recorded_sets().is_empty());
    }

    #[tokio::test]
    async fn test_cached_code_allowed_allows() {
        let cache = Arc::new(MockCache::with_entry("127.0.0.1", "US"));
        let lookup = Arc::new(MockLookup::returning(Ok("GB")));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 10);

        let decision = gate.evaluate("127.0.0.1:1234").await.unwrap();

        assert_eq!(decision, Decision::Allow);
        assert_eq!(lookup.call_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_caches_with_ttl() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Ok("US")));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 5);

        let decision = gate.evaluate("127.0.0.1:1234").await.unwrap();

        assert_eq!(decision, Decision::Allow);
        assert_eq!(lookup.call_count(), 1);
        assert_eq!(
            cache.recorded_sets(),
            vec![("127.0.0.1".to_string(), "US".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_fails_without_cache_write() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Err(LookupError::Status(401))));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 5);

        let result = gate.evaluate("127.0.0.1:1234").await;

        match result {
            Err(GateError::LookupFailed { ip, source }) => {
                assert_eq!(ip, "127.0.0.1");
                assert_eq!(source, LookupError::Status(401));
            }
            other => panic!("expected LookupFailed, got {:?}", other),
        }
        assert!(cache.recorded_sets().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_fails_without_cache_write() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Err(LookupError::Transport(
            "unable to perform request".to_string(),
        ))));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 5);

        let result = gate.evaluate("127.0.0.1:1234").await;

        assert!(matches!(result, Err(GateError::LookupFailed { .. })));
        assert_eq!(lookup.call_count(), 1);
        assert!(cache.recorded_sets().is_empty());
    }

    #[tokio::test]
    async fn test_address_without_port_touches_no_collaborator() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Ok("US")));
        let gate = gate(cache.clone(), lookup.clone(), &["US"], 5);

        let result = gate.evaluate("127.0.0.1").await;

        assert!(matches!(result, Err(GateError::MalformedAddress(ref a)) if a == "127.0.0.1"));
        assert_eq!(cache.get_count(), 0);
        assert_eq!(lookup.call_count(), 0);
        assert!(cache.recorded_sets().is_empty());
    }

    // ===== Cache Failure Tests =====

    #[tokio::test]
    async fn test_cache_read_error_falls_through_to_lookup() {
        let cache = Arc::new(MockCache {
            fail_reads: true,
            ..Default::default()
        });
        let lookup = Arc::new(MockLookup::returning(Ok("CY")));
        let gate = gate(cache.clone(), lookup.clone(), &["CY"], 10);

        let decision = gate.evaluate("10.0.0.1:80").await.unwrap();

        assert_eq!(decision, Decision::Allow);
        assert_eq!(lookup.call_count(), 1);
        assert_eq!(cache.recorded_sets().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_write_error_is_not_surfaced() {
        let cache = Arc::new(MockCache {
            fail_writes: true,
            ..Default::default()
        });
        let lookup = Arc::new(MockLookup::returning(Ok("CY")));
        let gate = gate(cache.clone(), lookup.clone(), &["CY"], 10);

        let decision = gate.evaluate("10.0.0.1:80").await.unwrap();

        assert_eq!(decision, Decision::Allow);
        assert_eq!(cache.recorded_sets().len(), 1);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Ok("CY")));
        let gate = gate(cache.clone(), lookup.clone(), &["CY"], 10);

        gate.evaluate("10.0.0.1:80").await.unwrap();
        gate.evaluate("10.0.0.1:81").await.unwrap();

        assert_eq!(lookup.call_count(), 1);
        assert_eq!(cache.get_count(), 2);
    }

    // ===== Decision Tests =====

    #[tokio::test]
    async fn test_lookup_result_is_matched_case_sensitively() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Ok("us")));
        let gate = gate(cache, lookup, &["US"], 10);

        assert_eq!(gate.evaluate("127.0.0.1:1234").await.unwrap(), Decision::Deny);
    }

    #[tokio::test]
    async fn test_substring_of_allowed_entry_is_denied() {
        let cache = Arc::new(MockCache::with_entry("127.0.0.1", "Undef"));
        let lookup = Arc::new(MockLookup::returning(Ok("CY")));
        let gate = gate(cache, lookup, &["CY", "Undefined"], 10);

        assert_eq!(gate.evaluate("127.0.0.1:1234").await.unwrap(), Decision::Deny);
    }

    #[tokio::test]
    async fn test_ipv6_host_used_as_key() {
        let cache = Arc::new(MockCache::default());
        let lookup = Arc::new(MockLookup::returning(Ok("CY")));
        let gate = gate(cache.clone(), lookup.clone(), &["CY"], 10);

        gate.evaluate("[2001:db8::1]:443").await.unwrap();

        assert_eq!(lookup.calls.lock().unwrap().as_slice(), ["2001:db8::1"]);
        assert_eq!(cache.recorded_sets()[0].0, "2001:db8::1");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_deny_is_logged_with_code() {
        let cache = Arc::new(MockCache::with_entry("127.0.0.1", "GB"));
        let lookup = Arc::new(MockLookup::returning(Ok("GB")));
        let gate = gate(cache, lookup, &["US"], 10);

        gate.evaluate("127.0.0.1:1234").await.unwrap();

        assert!(logs_contain("country code not allowed"));
        assert!(logs_contain("GB"));
    }
}
