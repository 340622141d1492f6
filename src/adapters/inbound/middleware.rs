//! Access gate middleware
//!
//! Resolves the caller's country before the request reaches the handler.
//!
//! ```ignore
//! let gate = middleware::from_fn_with_state(state.clone(), access_gate_middleware);
//! Router::new().route("/companies", post(create_company).layer(gate));
//! ```

use super::api_server::ApiState;
use super::responses::ApiMessage;
use crate::domain::services::GateError;
use crate::domain::value_objects::Decision;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};

/// Reject requests whose source country is not on the allowlist.
///
/// - malformed client address: 500
/// - country lookup failure: 500
/// - country not allowed: 401
pub async fn access_gate_middleware(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Response {
    let remote_addr = client_address(&request, state.trust_proxy_headers);

    match state.gate.evaluate(&remote_addr).await {
        Ok(Decision::Allow) => next.run(request).await,
        Ok(Decision::Deny) => {
            ApiMessage::new(StatusCode::UNAUTHORIZED, "Country not allowed").into_response()
        }
        Err(GateError::MalformedAddress(_)) => {
            ApiMessage::internal("Invalid client address").into_response()
        }
        Err(GateError::LookupFailed { .. }) => {
            ApiMessage::internal("Cannot resolve client country").into_response()
        }
    }
}

/// Raw `host:port` string for the caller.
///
/// Uses the connection peer address. With `trust_proxy_headers`, the host
/// comes from `X-Real-IP` or the first `X-Forwarded-For` entry and keeps
/// the peer's port. Without any address the result is empty.
pub fn client_address(request: &Request, trust_proxy_headers: bool) -> String {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(request.headers()) {
            let port = peer.map(|addr| addr.port()).unwrap_or(0);
            return SocketAddr::new(ip, port).to_string();
        }
    }

    peer.map(|addr| addr.to_string()).unwrap_or_default()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    [real_ip, forwarded_for]
        .into_iter()
        .flatten()
        .find_map(|candidate| candidate.parse().ok())
}
