use std::net::SocketAddr;

use anyhow::Context;
use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and expose it on `bind_addr`.
///
/// Counters recorded by the repository (`usage_fetch_*`,
/// `usage_documents_missing_total`) show up once this has run; without it
/// the `metrics` macros are no-ops.
pub fn init(bind_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid metrics.bind_addr '{bind_addr}'"))?;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus metrics recorder")?;

    tokio::spawn(serve(addr, handle));
    Ok(())
}

/// `/metrics` scrape route backed by `handle`.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

async fn serve(addr: SocketAddr, handle: PrometheusHandle) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind metrics listener");
            return;
        }
    };

    tracing::info!(%addr, "serving usage dashboard metrics");
    if let Err(e) = axum::serve(listener, router(handle).into_make_service()).await {
        tracing::error!(error = %e, "metrics server error");
    }
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
