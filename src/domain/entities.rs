//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the companies domain.
//! They have no external dependencies and contain only business logic.

use serde::{Deserialize, Serialize};

/// A company stored in the relational store.
///
/// The identifier is assigned by the store on creation. Timestamps are
/// maintained by the store and never leave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Store-assigned identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Business code
    pub code: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,
    /// Website domain
    pub website: String,
    /// Phone number (E.164)
    pub phone: String,
}

/// Incoming company data, as decoded from a request body.
///
/// Missing JSON fields decode as empty strings so that validation can
/// report them as `required` rather than failing the decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyPayload {
    pub name: String,
    pub code: String,
    pub country: String,
    pub website: String,
    pub phone: String,
}

impl CompanyPayload {
    /// Build a company entity carrying the given identifier.
    pub fn into_company(self, id: u64) -> Company {
        Company {
            id,
            name: self.name,
            code: self.code,
            country: self.country,
            website: self.website,
            phone: self.phone,
        }
    }
}

/// Exact-match filter for listing companies.
///
/// Decoded from the query string. Absent or empty fields do not
/// constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl CompanyFilter {
    /// Column/value pairs for every field that constrains the listing.
    pub fn conditions(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("code", &self.code),
            ("country", &self.country),
            ("website", &self.website),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter_map(|(column, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((column, v)),
            _ => None,
        })
        .collect()
    }
}
