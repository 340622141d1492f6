//! Country Lookup Port
//!
//! Defines the interface for resolving client IP addresses to country codes
//! through a remote geolocation service.

use crate::domain::value_objects::CountryCode;
use async_trait::async_trait;

/// Failure while resolving an IP through the remote service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The service answered with a non-success status.
    #[error("lookup service responded with status {0}")]
    Status(u16),
    /// The request never produced a usable response (DNS, connect,
    /// timeout, or body read failure).
    #[error("lookup request failed: {0}")]
    Transport(String),
}

/// Resolver for IP address to country code.
///
/// This is an outbound port that abstracts the geolocation service.
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    /// Resolve an IP (or host) to the country code reported by the service.
    async fn fetch(&self, ip: &str) -> Result<CountryCode, LookupError>;
}
