//! Companies API Server
//!
//! HTTP API for creating, reading, updating and removing companies.
//! Mutating routes that create or remove companies sit behind the
//! country access gate.

use super::extractors::{LoadedCompany, ValidatedPayload};
use super::middleware::access_gate_middleware;
use super::responses::{ApiMessage, CompaniesResponse, HealthResponse};
use crate::application::CompanyService;
use crate::domain::entities::CompanyFilter;
use crate::domain::services::AccessGate;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    /// Company use cases
    pub companies: Arc<CompanyService>,
    /// Country access gate for protected routes
    pub gate: Arc<AccessGate>,
    /// Take the client address from `X-Real-IP` / `X-Forwarded-For`
    pub trust_proxy_headers: bool,
}

impl ApiState {
    pub fn new(companies: Arc<CompanyService>, gate: Arc<AccessGate>) -> Self {
        Self {
            companies,
            gate,
            trust_proxy_headers: false,
        }
    }

    pub fn with_trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }
}

/// Build the companies router.
///
/// | Method | Path              | Gated |
/// |--------|-------------------|-------|
/// | GET    | `/health`         | no    |
/// | POST   | `/companies`      | yes   |
/// | GET    | `/companies`      | no    |
/// | GET    | `/companies/:id`  | no    |
/// | PUT    | `/companies/:id`  | no    |
/// | DELETE | `/companies/:id`  | yes   |
pub fn build_router(state: ApiState) -> Router {
    let gate = middleware::from_fn_with_state(state.clone(), access_gate_middleware);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/companies",
            post(create_company).layer(gate.clone()).get(list_companies),
        )
        .route(
            "/companies/:id",
            delete(delete_company)
                .layer(gate)
                .get(get_company)
                .put(update_company),
        )
        .with_state(state);

    with_http_layers(router)
}

/// Tracing and panic recovery shared by every route.
fn with_http_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// A panicking handler becomes a 500 instead of a dropped connection.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");

    ApiMessage::internal("Internal server error").into_response()
}

/// HTTP server for the companies API.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: impl Into<String>, state: ApiState) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("Companies API listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        tracing::info!("Companies API stopped");
        Ok(())
    }
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_company(
    State(state): State<ApiState>,
    ValidatedPayload(payload): ValidatedPayload,
) -> Result<impl IntoResponse, ApiMessage> {
    let company = state.companies.create(payload).await.map_err(|e| {
        tracing::error!(error = %e, "company cannot be created");
        ApiMessage::internal("Company cannot be created")
    })?;

    Ok((StatusCode::CREATED, Json(company)))
}

async fn list_companies(
    State(state): State<ApiState>,
    filter: Result<Query<CompanyFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiMessage> {
    let Query(filter) = filter.map_err(|rejection| {
        tracing::warn!(error = %rejection, "cannot decode query params");
        ApiMessage::bad_request("Invalid query params")
    })?;

    let companies = state.companies.list(&filter).await.map_err(|e| {
        tracing::error!(error = %e, "cannot retrieve companies");
        ApiMessage::internal("Cannot retrieve companies")
    })?;

    Ok(Json(CompaniesResponse { companies }))
}

async fn get_company(LoadedCompany(company): LoadedCompany) -> impl IntoResponse {
    Json(company)
}

async fn update_company(
    State(state): State<ApiState>,
    LoadedCompany(existing): LoadedCompany,
    ValidatedPayload(payload): ValidatedPayload,
) -> Result<impl IntoResponse, ApiMessage> {
    let updated = state
        .companies
        .update(&existing, payload)
        .await
        .map_err(|e| {
            tracing::error!(id = existing.id, error = %e, "cannot update company");
            ApiMessage::internal("Cannot update company")
        })?;

    Ok(Json(updated))
}

async fn delete_company(
    State(state): State<ApiState>,
    LoadedCompany(company): LoadedCompany,
) -> Result<impl IntoResponse, ApiMessage> {
    state.companies.delete(&company).await.map_err(|e| {
        tracing::error!(id = company.id, error = %e, "cannot remove company");
        ApiMessage::internal("Cannot remove company")
    })?;

    Ok(ApiMessage::new(StatusCode::OK, "Company removed"))
}
