mod access_gate;
mod company_validator;

pub use access_gate::{AccessGate, GateConfig, GateError};
pub use company_validator::{is_fqdn, is_iso3166_alpha2, CompanyValidator};
