//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports (SQLite, Moka, geolocation HTTP client).

pub mod inbound;
pub mod outbound;
