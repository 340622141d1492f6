//! Payload Validator Port

use crate::domain::entities::CompanyPayload;
use std::fmt;

/// A single failed rule on a payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, rule: &'static str) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field validation for '{}' failed on the '{}' tag",
            self.field, self.rule
        )
    }
}

/// Validates decoded company payloads.
///
/// An empty result means the payload is valid.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, payload: &CompanyPayload) -> Vec<FieldError>;
}
