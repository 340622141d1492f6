//! ipapi Country Lookup
//!
//! Implements CountryLookup against an ipapi-compatible HTTP service:
//! `GET {base_url}/{ip}/country` answers with the bare country code.

use crate::domain::ports::{CountryLookup, LookupError};
use crate::domain::value_objects::CountryCode;
use async_trait::async_trait;
use std::time::Duration;

/// User-Agent sent with every lookup.
pub const USER_AGENT: &str = concat!("companies-api/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the geolocation service.
pub struct IpapiCountryLookup {
    client: reqwest::Client,
    base_url: String,
}

impl IpapiCountryLookup {
    /// Build a client with the given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn country_url(&self, ip: &str) -> String {
        format!("{}/{}/country", self.base_url, ip)
    }
}

#[async_trait]
impl CountryLookup for IpapiCountryLookup {
    async fn fetch(&self, ip: &str) -> Result<CountryCode, LookupError> {
        let url = self.country_url(ip);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), ip, "lookup response status is not OK");
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let code = String::from_utf8_lossy(&body).into_owned();
        tracing::debug!(ip, code = %code, "resolved country");
        Ok(CountryCode::from(code))
    }
}
