//! HTTP server: every page request is a render pass over the cached snapshot.

use crate::pass::{run_render_pass, PassOutput};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use health_perf_ingestion::DatasetCache;
use health_perf_render::{HtmlPresenter, JsonPresenter, Presenter};
use health_perf_telemetry::Metrics;
use std::sync::Arc;
use tracing::{error, info};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    pub metrics: Metrics,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/report", get(report_handler))
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn dashboard_handler(State(state): State<AppState>) -> Response {
    render_response(state, HtmlPresenter, "html").await
}

async fn report_handler(State(state): State<AppState>) -> Response {
    render_response(state, JsonPresenter, "json").await
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.gather() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run a render pass off the async runtime (the first pass reads the CSV files).
async fn render_response<P>(state: AppState, presenter: P, view: &'static str) -> Response
where
    P: Presenter + 'static,
{
    let content_type = presenter.content_type();
    let result = tokio::task::spawn_blocking(move || {
        run_render_pass(&state.cache, &state.metrics, &presenter, view)
    })
    .await;

    match result {
        Ok(Ok(PassOutput::Page(body))) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Ok(Ok(PassOutput::LoadFailed { body, .. })) => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, content_type)],
            body,
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Failed to render {} view: {}", view, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            error!("Render task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
