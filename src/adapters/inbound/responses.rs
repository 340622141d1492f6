//! HTTP response bodies shared by handlers, extractors and middleware.

use crate::domain::entities::Company;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Status message body, used for errors and for bare acknowledgements.
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiMessage {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiMessage {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// List of companies response.
#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<Company>,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_omits_empty_errors() {
        let msg = ApiMessage::internal("Cannot remove company");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"message":"Cannot remove company"}"#
        );
    }

    #[test]
    fn test_message_with_errors() {
        let msg = ApiMessage::bad_request("Invalid request data")
            .with_errors(vec!["bad name".to_string()]);
        assert_eq!(msg.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"message":"Invalid request data","errors":["bad name"]}"#
        );
    }

    #[test]
    fn test_message_into_response_uses_status() {
        let response = ApiMessage::new(StatusCode::NOT_FOUND, "Company not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_companies_response_shape() {
        let body = CompaniesResponse { companies: vec![] };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"companies":[]}"#);
    }
}
