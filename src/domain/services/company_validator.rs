//! Company Payload Validation
//!
//! Field rules for incoming company data. Each field reports at most one
//! failure: the first rule it breaks, checked in declaration order.

use crate::domain::entities::CompanyPayload;
use crate::domain::ports::{FieldError, PayloadValidator};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_TEXT_LEN: usize = 255;

static E164: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]?[0-9]{7,14}$").expect("valid E.164 regex"));

static FQDN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62})(\.[a-zA-Z0-9]{1}[a-zA-Z0-9-]{0,62})*?(\.[a-zA-Z]{1}[a-zA-Z0-9]{0,62})\.?$",
    )
    .expect("valid FQDN regex")
});

/// Officially assigned ISO 3166-1 alpha-2 codes.
const ISO3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Rule-based validator for company payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyValidator;

impl CompanyValidator {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadValidator for CompanyValidator {
    fn validate(&self, payload: &CompanyPayload) -> Vec<FieldError> {
        [
            check_text("name", &payload.name),
            check_text("code", &payload.code),
            check_country("country", &payload.country),
            check_fqdn("website", &payload.website),
            check_e164("phone", &payload.phone),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn check_text(field: &'static str, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(field, "required"));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Some(FieldError::new(field, "max"));
    }
    None
}

fn check_country(field: &'static str, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(field, "required"));
    }
    if !is_iso3166_alpha2(value) {
        return Some(FieldError::new(field, "iso3166_1_alpha2"));
    }
    None
}

fn check_fqdn(field: &'static str, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(field, "required"));
    }
    if !is_fqdn(value) {
        return Some(FieldError::new(field, "fqdn"));
    }
    None
}

fn check_e164(field: &'static str, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::new(field, "required"));
    }
    if !E164.is_match(value) {
        return Some(FieldError::new(field, "e164"));
    }
    None
}

pub fn is_iso3166_alpha2(code: &str) -> bool {
    ISO3166_ALPHA2.binary_search(&code).is_ok()
}

pub fn is_fqdn(value: &str) -> bool {
    FQDN.is_match(value)
}
