//! Prometheus metrics for the dashboard service.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

/// Metrics collector for dashboard loads and render passes.
///
/// Each instance registers into its own `Registry`.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    render_passes: IntCounterVec,
    render_latency: HistogramVec,
    load_duration: Histogram,
    rows_loaded: IntGaugeVec,
    rows_dropped: IntCounterVec,
    load_failures: IntCounterVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let render_passes = IntCounterVec::new(
            Opts::new(
                "health_perf_render_passes_total",
                "Total number of dashboard render passes",
            ),
            &["view"],
        )?;

        let render_latency = HistogramVec::new(
            HistogramOpts::new(
                "health_perf_render_latency_seconds",
                "Time spent aggregating and rendering one pass",
            ),
            &["view"],
        )?;

        let load_duration = Histogram::with_opts(HistogramOpts::new(
            "health_perf_load_duration_seconds",
            "Time spent reading the CSV datasets",
        ))?;

        let rows_loaded = IntGaugeVec::new(
            Opts::new("health_perf_rows_loaded", "Rows held in the loaded snapshot"),
            &["dataset"],
        )?;

        let rows_dropped = IntCounterVec::new(
            Opts::new(
                "health_perf_rows_dropped_total",
                "Rows excluded from an aggregation",
            ),
            &["reason"],
        )?;

        let load_failures = IntCounterVec::new(
            Opts::new(
                "health_perf_load_failures_total",
                "Dataset loads that ended in an error",
            ),
            &["kind"],
        )?;

        registry.register(Box::new(render_passes.clone()))?;
        registry.register(Box::new(render_latency.clone()))?;
        registry.register(Box::new(load_duration.clone()))?;
        registry.register(Box::new(rows_loaded.clone()))?;
        registry.register(Box::new(rows_dropped.clone()))?;
        registry.register(Box::new(load_failures.clone()))?;

        Ok(Self {
            registry,
            render_passes,
            render_latency,
            load_duration,
            rows_loaded,
            rows_dropped,
            load_failures,
        })
    }

    /// Increment the render pass counter for a view ("html", "json", "text").
    pub fn inc_render_passes(&self, view: &str) {
        self.render_passes.with_label_values(&[view]).inc();
    }

    /// Record how long a render pass took.
    pub fn observe_render_latency(&self, view: &str, duration_secs: f64) {
        self.render_latency.with_label_values(&[view]).observe(duration_secs);
    }

    /// Record how long the dataset load took.
    pub fn observe_load_duration(&self, duration_secs: f64) {
        self.load_duration.observe(duration_secs);
    }

    /// Set the number of rows loaded for a dataset.
    pub fn set_rows_loaded(&self, dataset: &str, rows: usize) {
        self.rows_loaded.with_label_values(&[dataset]).set(rows as i64);
    }

    /// Count rows dropped from an aggregation.
    pub fn inc_rows_dropped(&self, reason: &str, count: u64) {
        self.rows_dropped.with_label_values(&[reason]).inc_by(count);
    }

    /// Count a failed load by error kind.
    pub fn inc_load_failures(&self, kind: &str) {
        self.load_failures.with_label_values(&[kind]).inc();
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_registries() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();

        first.inc_render_passes("html");
        first.inc_render_passes("html");
        second.inc_render_passes("json");

        let first_text = first.gather().unwrap();
        assert!(first_text.contains("health_perf_render_passes_total{view=\"html\"} 2"));
        assert!(!first_text.contains("view=\"json\""));
    }

    #[test]
    fn test_rows_gauges_and_drops() {
        let metrics = Metrics::new().unwrap();
        metrics.set_rows_loaded("facilities", 12);
        metrics.inc_rows_dropped("malformed_month", 3);

        let text = metrics.gather().unwrap();
        assert!(text.contains("health_perf_rows_loaded{dataset=\"facilities\"} 12"));
        assert!(text.contains("health_perf_rows_dropped_total{reason=\"malformed_month\"} 3"));
    }
}
