//! companies-api - Company CRUD service with a country access gate
//!
//! This is the composition root that wires together all the components.

use companies_api::adapters::inbound::{ApiServer, ApiState};
use companies_api::adapters::outbound::{
    IpapiCountryLookup, MokaCountryCache, SqliteCompanyRepository,
};
use companies_api::application::CompanyService;
use companies_api::config::{load_config, Config};
use companies_api::domain::services::{AccessGate, CompanyValidator};
use companies_api::infrastructure::{shutdown_signal, ShutdownController};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

fn init_tracing(cfg: &Config) {
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE);

    if cfg.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    init_tracing(&cfg);

    tracing::info!(
        "starting companies-api v{} listen={}",
        env!("CARGO_PKG_VERSION"),
        cfg.listen_addr
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters
    let repo = Arc::new(SqliteCompanyRepository::open(&cfg.db_path)?);
    tracing::info!("company store opened at {}", cfg.db_path);

    let cache = Arc::new(MokaCountryCache::with_size_mb(cfg.cache_size_mb));
    let lookup = Arc::new(IpapiCountryLookup::new(
        cfg.ipapi.base_url.clone(),
        cfg.lookup_timeout(),
    )?);

    // 2. Domain services
    let gate_config = cfg.gate_config();
    tracing::info!(
        allowed = ?cfg.ipapi.allowed_countries,
        ttl_secs = gate_config.ttl_secs,
        lookup = %cfg.ipapi.base_url,
        "access gate configured"
    );
    let gate = Arc::new(AccessGate::new(cache, lookup, gate_config));

    // 3. Application service
    let companies = Arc::new(CompanyService::new(repo, Arc::new(CompanyValidator::new())));

    // 4. Inbound adapter
    let state = ApiState::new(companies, gate).with_trust_proxy_headers(cfg.trust_proxy_headers);
    let server = ApiServer::new(cfg.listen_addr.clone(), state);

    let controller = ShutdownController::new();
    tokio::spawn(shutdown_signal(controller.clone()));

    server.run(controller.wait()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
