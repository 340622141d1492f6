//! Request extractors
//!
//! Typed replacements for per-request context values: handlers receive the
//! decoded payload and the loaded company as plain arguments.

use super::api_server::ApiState;
use super::responses::ApiMessage;
use crate::domain::entities::{Company, CompanyPayload};
use crate::domain::ports::RepositoryError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    Json,
};

/// Company payload decoded from a JSON body and checked by the validator.
///
/// Rejects with 400 `Invalid JSON` when the body cannot be decoded and 400
/// `Invalid request data` (with per-field errors) when validation fails.
#[derive(Debug)]
pub struct ValidatedPayload(pub CompanyPayload);

#[async_trait]
impl FromRequest<ApiState> for ValidatedPayload {
    type Rejection = ApiMessage;

    async fn from_request(req: Request, state: &ApiState) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<CompanyPayload>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "company payload rejected");
                ApiMessage::bad_request("Invalid JSON")
            })?;

        let errors = state.companies.validate(&payload);
        if !errors.is_empty() {
            return Err(ApiMessage::bad_request("Invalid request data")
                .with_errors(errors.iter().map(ToString::to_string).collect()));
        }

        Ok(Self(payload))
    }
}

/// Company loaded from the `{id}` path segment.
#[derive(Debug)]
pub struct LoadedCompany(pub Company);

#[async_trait]
impl FromRequestParts<ApiState> for LoadedCompany {
    type Rejection = ApiMessage;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let Path(raw_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiMessage::bad_request("Invalid ID"))?;

        let id = parse_id(&raw_id).ok_or_else(|| {
            tracing::warn!(id = %raw_id, "ID URL param invalid");
            ApiMessage::bad_request("Invalid ID")
        })?;

        match state.companies.get(id).await {
            Ok(company) => Ok(Self(company)),
            Err(RepositoryError::NotFound) => {
                Err(ApiMessage::new(StatusCode::NOT_FOUND, "Company not found"))
            }
            Err(e) => {
                tracing::error!(id, error = %e, "cannot query company");
                Err(ApiMessage::internal("Cannot query company"))
            }
        }
    }
}

/// Digits only; no sign, no whitespace.
fn parse_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
