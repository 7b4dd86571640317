//! Presentation layer for the dashboard report.
//!
//! The [`Presenter`] trait is the seam between the aggregation pipelines and
//! whatever displays them. HTML, plain text and JSON implementations ship
//! with the crate; other displays can implement the trait without touching
//! the pipelines.

pub mod html;
pub mod json;
pub mod page;
pub mod text;

use health_perf_analytics::DashboardReport;
use health_perf_ingestion::LoadError;

pub use html::HtmlPresenter;
pub use json::JsonPresenter;
pub use text::TextPresenter;

/// Error type for rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Turns a report into a displayable document.
pub trait Presenter: Send + Sync {
    /// Render one pass of the dashboard.
    fn render(&self, report: &DashboardReport) -> RenderResult<String>;

    /// Render the single message shown when the datasets could not be loaded.
    fn render_load_error(&self, error: &LoadError) -> String;

    /// MIME type of the rendered document.
    fn content_type(&self) -> &'static str;
}

/// Format a cylinder count without a trailing `.0` for whole numbers.
pub(crate) fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
