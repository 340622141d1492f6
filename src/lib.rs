//! companies-api Library
//!
//! This module exposes the companies-api components for use in integration
//! tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{build_router, ApiServer, ApiState};
pub use application::CompanyService;
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{Company, CompanyFilter, CompanyPayload};
pub use domain::ports::{CompanyRepository, CountryCache, CountryLookup, PayloadValidator};
pub use domain::services::{AccessGate, CompanyValidator, GateConfig};
pub use domain::value_objects::{Allowlist, CountryCode, Decision};
