//! JSON output of the report.

use crate::{Presenter, RenderResult};
use health_perf_analytics::DashboardReport;
use health_perf_ingestion::LoadError;

/// Pretty-printed JSON presenter.
pub struct JsonPresenter;

impl Presenter for JsonPresenter {
    fn render(&self, report: &DashboardReport) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn render_load_error(&self, error: &LoadError) -> String {
        serde_json::json!({
            "error": error.to_string(),
            "kind": error.kind(),
        })
        .to_string()
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
