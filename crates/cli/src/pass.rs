//! One render pass: cached snapshot → report → presenter.

use health_perf_analytics::DashboardReport;
use health_perf_ingestion::{DatasetCache, LoadError};
use health_perf_render::{Presenter, RenderError};
use health_perf_telemetry::Metrics;
use std::time::Instant;
use tracing::debug;

/// What a render pass produced.
pub enum PassOutput {
    /// The rendered dashboard.
    Page(String),
    /// The datasets could not be loaded; `body` is the presenter's error view.
    LoadFailed { body: String, error: LoadError },
}

/// Run every section against the cached snapshot and render the result.
///
/// The snapshot is loaded on the first pass only. This call does blocking
/// file I/O on that first pass.
pub fn run_render_pass(
    cache: &DatasetCache,
    metrics: &Metrics,
    presenter: &dyn Presenter,
    view: &str,
) -> Result<PassOutput, RenderError> {
    let start = Instant::now();
    metrics.inc_render_passes(view);

    let output = match cache.get() {
        Ok(snapshot) => {
            let report = DashboardReport::build(snapshot);
            PassOutput::Page(presenter.render(&report)?)
        }
        Err(e) => PassOutput::LoadFailed {
            body: presenter.render_load_error(e),
            error: e.clone(),
        },
    };

    let elapsed = start.elapsed().as_secs_f64();
    metrics.observe_render_latency(view, elapsed);
    debug!("Rendered {} view in {:.3}s", view, elapsed);
    Ok(output)
}
