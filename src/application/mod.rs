//! Application Layer
//!
//! Use cases that orchestrate the domain through its ports.

mod company_service;

pub use company_service::CompanyService;
