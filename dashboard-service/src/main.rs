use anyhow::{Context, Result};
use dashboard_service::{
    config::AppConfig,
    http_api::{self, ApiState, Households},
    metrics_server, observability,
    repository::{UsageCollections, UsageRepository},
};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use usage_client::db::PgUsageCollection;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration; anything missing stops startup here.
    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // Lazy pool: store outages surface per request as fetch failures.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.store.max_connections)
        .connect_lazy(&cfg.store.uri)
        .context("invalid store.uri")?;

    let database = &cfg.store.database;
    let collections = UsageCollections {
        water: Arc::new(PgUsageCollection::new(pool.clone(), database, &cfg.collections.water)?),
        electricity: Arc::new(PgUsageCollection::new(
            pool.clone(),
            database,
            &cfg.collections.electricity,
        )?),
        electricity_reference: Arc::new(PgUsageCollection::new(
            pool,
            database,
            &cfg.collections.electricity_reference,
        )?),
    };

    let state = ApiState {
        repository: Arc::new(UsageRepository::new(collections)),
        households: Arc::new(Households {
            options: cfg.dashboard.households.clone(),
            default: cfg.dashboard.default_household.clone(),
        }),
    };

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, database = %database, "usage dashboard listening");

    axum::serve(listener, http_api::router(state).into_make_service()).await?;

    Ok(())
}
