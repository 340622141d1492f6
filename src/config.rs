use crate::domain::services::GateConfig;
use crate::domain::value_objects::Allowlist;
use std::time::Duration;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("IPAPI_BASE_URL must not be empty")]
    EmptyBaseUrl,
    #[error("CACHE_SIZE_MB must be greater than zero")]
    ZeroCacheSize,
    #[error("IPAPI_TIMEOUT must be greater than zero")]
    ZeroTimeout,
}

/// Geolocation service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpapiConfig {
    pub base_url: String,
    /// Lifetime of a cached country code
    pub ttl_secs: u64,
    /// Per-request timeout for the lookup
    pub timeout_secs: u64,
    pub allowed_countries: Vec<String>,
}

impl Default for IpapiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipapi.co".to_string(),
            ttl_secs: 10,
            timeout_secs: 10,
            allowed_countries: vec!["CY".to_string(), "Undefined".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // HTTP server
    pub listen_addr: String,
    pub trust_proxy_headers: bool,

    // Storage
    pub db_path: String,
    pub cache_size_mb: u64,

    // Access gate
    pub ipapi: IpapiConfig,

    // Logging
    pub debug: bool,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9090".to_string(),
            trust_proxy_headers: false,
            db_path: "companies.db".to_string(),
            cache_size_mb: 100,
            ipapi: IpapiConfig::default(),
            debug: false,
            log_json: false,
        }
    }
}

impl Config {
    /// Build a config from a variable lookup function.
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let ipapi_defaults = defaults.ipapi.clone();

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = parse_or(lookup("PORT"), 9090);
        let listen_addr = if host.contains(':') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };

        let allowed_countries = lookup("IPAPI_ALLOWED_COUNTRIES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(ipapi_defaults.allowed_countries);

        Config {
            listen_addr,
            trust_proxy_headers: lookup("TRUST_PROXY_HEADERS")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.trust_proxy_headers),
            db_path: lookup("DATABASE_PATH").unwrap_or(defaults.db_path),
            cache_size_mb: parse_or(lookup("CACHE_SIZE_MB"), defaults.cache_size_mb),
            ipapi: IpapiConfig {
                base_url: lookup("IPAPI_BASE_URL").unwrap_or(ipapi_defaults.base_url),
                ttl_secs: parse_or(lookup("IPAPI_TTL"), ipapi_defaults.ttl_secs),
                timeout_secs: parse_or(lookup("IPAPI_TIMEOUT"), ipapi_defaults.timeout_secs),
                allowed_countries,
            },
            debug: lookup("DEBUG").is_some(),
            log_json: lookup("LOG_JSON")
                .map(|v| is_truthy(&v))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ipapi.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.cache_size_mb == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        if self.ipapi.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Access gate settings derived from this config.
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            allowlist: Allowlist::new(self.ipapi.allowed_countries.iter().cloned()),
            ttl_secs: self.ipapi.ttl_secs,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ipapi.timeout_secs)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.to_lowercase() == "true"
}

/// Read the configuration from the process environment.
pub fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_lookup(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
