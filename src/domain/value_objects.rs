//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Country code resolved for a client address.
///
/// Usually an ISO 3166-1 alpha-2 code, but the gate treats it as an
/// opaque string: whatever the lookup service returns is compared
/// verbatim against the allowlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CountryCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CountryCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of country codes allowed through the access gate.
///
/// Loaded once from configuration and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    codes: Vec<CountryCode>,
}

impl Allowlist {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CountryCode>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership test.
    pub fn permits(&self, code: &CountryCode) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

/// Outcome of evaluating a client against the allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Client address as delivered by the transport layer.
///
/// Accepts `host:port` and `[host]:port`. Only the host is kept: it is
/// the key for both the cache and the geolocation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress {
    host: String,
}

impl ClientAddress {
    /// Split a raw `host:port` string.
    ///
    /// Returns `None` when there is no separator between host and port,
    /// which also covers bare IPv6 literals without brackets, or when the
    /// host is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(rest) = raw.strip_prefix('[') {
            let (host, port) = rest.split_once("]:")?;
            if host.is_empty() || port.is_empty() {
                return None;
            }
            return Some(Self {
                host: host.to_string(),
            });
        }

        let (host, port) = raw.split_once(':')?;
        if host.is_empty() || port.contains(':') {
            return None;
        }

        Some(Self {
            host: host.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}
