//! Self-contained HTML dashboard with Chart.js charts.

use crate::page::*;
use crate::{format_quantity, Presenter, RenderResult};
use health_perf_analytics::clinical::ClinicalSummary;
use health_perf_analytics::governance::GovernanceSummary;
use health_perf_analytics::operations::{OperationsSummary, TOP_OXYGEN_LIMIT};
use health_perf_analytics::{DashboardReport, SectionError};
use health_perf_ingestion::LoadError;
use serde::Serialize;

/// Constants for dashboard styling
mod html_constants {
    /// Chart.js CDN URL for rendering charts
    pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

    pub const PROTOCOL_COLORS: [&str; 5] = ["#059669", "#dc2626", "#d97706", "#6b7280", "#2563eb"];
}

/// Chart series embedded in the page for the client-side script.
#[derive(Debug, Serialize)]
struct ChartData<'a> {
    protocol: Series<'a>,
    monthly: Option<Series<'a>>,
    district: Option<Series<'a>>,
    oxygen: Series<'a>,
}

#[derive(Debug, Serialize)]
struct Series<'a> {
    labels: Vec<String>,
    values: Vec<f64>,
    title: &'a str,
}

/// HTML presenter.
pub struct HtmlPresenter;

impl Presenter for HtmlPresenter {
    fn render(&self, report: &DashboardReport) -> RenderResult<String> {
        let body = format!(
            r#"
            <div class="container">
                {}
                {}
                {}
                {}
                {}
            </div>
            <script>window.dashboardData = {};</script>
            "#,
            Self::generate_header_section(report),
            Self::generate_governance_section(&report.governance),
            Self::generate_clinical_section(&report.clinical),
            Self::generate_operations_section(&report.operations),
            Self::generate_footer(),
            Self::chart_data_json(report)?,
        );
        Ok(Self::wrap_document(&body))
    }

    fn render_load_error(&self, error: &LoadError) -> String {
        let body = format!(
            r#"
            <div class="container">
                <div class="header"><h1>{}</h1></div>
                <div class="error-box">
                    <h2>{}</h2>
                    <p>{}</p>
                </div>
            </div>
            "#,
            escape_html(PAGE_TITLE),
            escape_html(LOAD_ERROR_TITLE),
            escape_html(&error.to_string()),
        );
        Self::wrap_document(&body)
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

impl HtmlPresenter {
    fn wrap_document(body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="{}"></script>
    <style>{}</style>
</head>
<body>
    {}
    <script>{}</script>
</body>
</html>"#,
            escape_html(PAGE_TITLE),
            html_constants::CHART_JS_CDN,
            Self::generate_css(),
            body,
            Self::generate_javascript(),
        )
    }

    fn generate_header_section(report: &DashboardReport) -> String {
        format!(
            r#"
            <div class="header">
                <h1>{}</h1>
                <p>{}</p>
                <p class="muted">Generated {} &middot; data loaded {}</p>
            </div>
            "#,
            escape_html(PAGE_TITLE),
            escape_html(PAGE_INTRO),
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.data_loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }

    fn generate_governance_section(governance: &GovernanceSummary) -> String {
        let table = if governance.compliant_facilities.is_empty() {
            r#"<p class="muted">No facility reports an existing newborn protocol.</p>"#.to_string()
        } else {
            let rows: String = governance
                .compliant_facilities
                .iter()
                .map(|f| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                        escape_html(&f.facility_name),
                        escape_html(&f.district),
                        escape_html(&f.tier_level)
                    )
                })
                .collect();
            format!(
                r#"<div class="table-scroll"><table>
                    <thead><tr><th>Facility</th><th>District</th><th>Tier</th></tr></thead>
                    <tbody>{}</tbody>
                </table></div>"#,
                rows
            )
        };

        format!(
            r#"
            <section>
                <h2>{}</h2>
                <p class="info">{}</p>
                <div class="two-columns">
                    <div class="chart-container">
                        <h3 class="chart-title">{}</h3>
                        <canvas id="protocolChart"></canvas>
                    </div>
                    <div class="chart-container">
                        <h3 class="chart-title">{} ({})</h3>
                        {}
                    </div>
                </div>
            </section>
            "#,
            escape_html(GOVERNANCE_HEADING),
            escape_html(GOVERNANCE_NOTE),
            escape_html(PROTOCOL_CHART_TITLE),
            escape_html(COMPLIANT_TABLE_TITLE),
            governance.compliant_facilities.len(),
            table
        )
    }

    fn generate_clinical_section(clinical: &Result<ClinicalSummary, SectionError>) -> String {
        let content = match clinical {
            Ok(summary) => {
                let note = if summary.dropped_rows > 0 {
                    format!(
                        r#"<p class="warning">{} rows with an unreadable reporting month were left out of the trend.</p>"#,
                        summary.dropped_rows
                    )
                } else {
                    String::new()
                };
                format!(
                    r#"
                    {}
                    <div class="chart-container">
                        <h3 class="chart-title">{}</h3>
                        <canvas id="monthlyChart"></canvas>
                    </div>
                    <div class="chart-container">
                        <h3 class="chart-title">{}</h3>
                        <canvas id="districtChart"></canvas>
                    </div>
                    "#,
                    note,
                    escape_html(MONTHLY_CHART_TITLE),
                    escape_html(DISTRICT_CHART_TITLE)
                )
            }
            Err(e) => format!(
                r#"<div class="error-box"><p>Section unavailable: {}</p></div>"#,
                escape_html(&e.to_string())
            ),
        };

        format!(
            r#"
            <section>
                <h2>{}</h2>
                {}
            </section>
            "#,
            escape_html(CLINICAL_HEADING),
            content
        )
    }

    fn generate_operations_section(operations: &OperationsSummary) -> String {
        let rows: String = operations
            .top_oxygen
            .iter()
            .map(|o| {
                format!(
                    "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
                    escape_html(&o.facility_name),
                    format_quantity(o.oxygen_cylinders_available)
                )
            })
            .collect();

        format!(
            r#"
            <section>
                <h2>{}</h2>
                <div class="chart-container">
                    <h3 class="chart-title">{} (top {})</h3>
                    <canvas id="oxygenChart"></canvas>
                </div>
                <details>
                    <summary>Table view</summary>
                    <table>
                        <thead><tr><th>Facility</th><th>Oxygen cylinders</th></tr></thead>
                        <tbody>{}</tbody>
                    </table>
                </details>
            </section>
            "#,
            escape_html(OPERATIONS_HEADING),
            escape_html(OXYGEN_CHART_TITLE),
            TOP_OXYGEN_LIMIT,
            rows
        )
    }

    fn generate_footer() -> String {
        format!(r#"<footer>{}</footer>"#, escape_html(FOOTER))
    }

    /// Chart series as JSON, safe to place inside a `<script>` element.
    fn chart_data_json(report: &DashboardReport) -> RenderResult<String> {
        let governance = &report.governance;
        let clinical = report.clinical.as_ref().ok();

        let data = ChartData {
            protocol: Series {
                labels: governance.protocol_counts.iter().map(|c| c.category.clone()).collect(),
                values: governance.protocol_counts.iter().map(|c| c.count as f64).collect(),
                title: PROTOCOL_CHART_TITLE,
            },
            monthly: clinical.map(|c| Series {
                labels: c.monthly_trend.iter().map(|p| p.month.to_string()).collect(),
                values: c.monthly_trend.iter().map(|p| p.live_births as f64).collect(),
                title: MONTHLY_CHART_TITLE,
            }),
            district: clinical.map(|c| Series {
                labels: c.births_by_district.iter().map(|d| d.district.clone()).collect(),
                values: c.births_by_district.iter().map(|d| d.live_births as f64).collect(),
                title: DISTRICT_CHART_TITLE,
            }),
            oxygen: Series {
                labels: report.operations.top_oxygen.iter().map(|o| o.facility_name.clone()).collect(),
                values: report
                    .operations
                    .top_oxygen
                    .iter()
                    .map(|o| o.oxygen_cylinders_available)
                    .collect(),
                title: OXYGEN_CHART_TITLE,
            },
        };

        Ok(serde_json::to_string(&data)?.replace("</", "<\\/"))
    }

    fn generate_css() -> &'static str {
        r#"
        :root {
            --primary-color: #2563eb;
            --success-color: #059669;
            --warning-color: #d97706;
            --error-color: #dc2626;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
            --text-secondary: #64748b;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        .header { text-align: center; margin-bottom: 2rem; }
        .header h1 { font-size: 2rem; }
        .muted { color: var(--text-secondary); font-size: 0.9rem; }

        section {
            border-top: 1px solid var(--border-color);
            padding-top: 1.5rem;
            margin-bottom: 2rem;
        }
        section h2 { margin-bottom: 0.75rem; }

        .info {
            background: #eff6ff;
            border-left: 4px solid var(--primary-color);
            padding: 0.5rem 1rem;
            margin-bottom: 1rem;
        }
        .warning { color: var(--warning-color); margin-bottom: 1rem; }
        .error-box {
            background: #fef2f2;
            border: 1px solid var(--error-color);
            color: var(--error-color);
            border-radius: 8px;
            padding: 1rem;
        }

        .two-columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        @media (max-width: 800px) { .two-columns { grid-template-columns: 1fr; } }

        .chart-container {
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }
        .chart-title { font-size: 1.1rem; margin-bottom: 1rem; }

        .table-scroll { max-height: 300px; overflow-y: auto; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid var(--border-color); }
        td.num { text-align: right; }
        details { margin-top: 0.5rem; }

        footer { text-align: center; color: var(--text-secondary); font-size: 0.85rem; margin-top: 2rem; }
        "#
    }

    fn generate_javascript() -> String {
        format!(
            r#"
        document.addEventListener('DOMContentLoaded', function() {{
            const data = window.dashboardData;
            if (typeof Chart === 'undefined' || !data) {{
                return;
            }}

            function draw(id, config) {{
                const ctx = document.getElementById(id);
                if (ctx) {{
                    new Chart(ctx, config);
                }}
            }}

            draw('protocolChart', {{
                type: 'pie',
                data: {{
                    labels: data.protocol.labels,
                    datasets: [{{ data: data.protocol.values, backgroundColor: {colors} }}]
                }},
                options: {{ responsive: true, plugins: {{ legend: {{ position: 'bottom' }} }} }}
            }});

            if (data.monthly) {{
                draw('monthlyChart', {{
                    type: 'line',
                    data: {{
                        labels: data.monthly.labels,
                        datasets: [{{ label: 'Live births', data: data.monthly.values, borderColor: '#2563eb', pointRadius: 4 }}]
                    }},
                    options: {{ responsive: true, scales: {{ y: {{ beginAtZero: true }} }} }}
                }});
            }}

            if (data.district) {{
                draw('districtChart', {{
                    type: 'bar',
                    data: {{
                        labels: data.district.labels,
                        datasets: [{{ label: 'Live births', data: data.district.values, backgroundColor: '#059669' }}]
                    }},
                    options: {{ responsive: true, plugins: {{ legend: {{ display: false }} }} }}
                }});
            }}

            draw('oxygenChart', {{
                type: 'bar',
                data: {{
                    labels: data.oxygen.labels,
                    datasets: [{{ label: 'Oxygen cylinders', data: data.oxygen.values, backgroundColor: '#2563eb' }}]
                }},
                options: {{ indexAxis: 'y', responsive: true, plugins: {{ legend: {{ display: false }} }} }}
            }});
        }});
        "#,
            colors = serde_json::json!(html_constants::PROTOCOL_COLORS)
        )
    }
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_perf_ingestion::{
        ClinicalRecord, DataSnapshot, Facility, GovernanceRecord, OperationsRecord,
    };
    use std::path::PathBuf;

    fn report(month: &str) -> DashboardReport {
        let snapshot = DataSnapshot::new(
            vec![
                Facility::new("1", "Hôpital <Principal>", "Dakar", "T1"),
                Facility::new("2", "Poste Sud", "Thies", "T3"),
            ],
            vec![ClinicalRecord::new("1", month, 12)],
            vec![
                GovernanceRecord::new("1", "Yes"),
                GovernanceRecord::new("2", "Outdated"),
            ],
            vec![
                OperationsRecord::new("1", 8.0),
                OperationsRecord::new("2", 0.0),
            ],
        )
        .unwrap();
        DashboardReport::build(&snapshot)
    }

    #[test]
    fn test_render_contains_sections() {
        let html = HtmlPresenter.render(&report("2024-01")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(GOVERNANCE_HEADING.replace('&', "&amp;").as_str()));
        assert!(html.contains("id=\"monthlyChart\""));
        assert!(html.contains("id=\"oxygenChart\""));
        assert!(html.contains("Hôpital &lt;Principal&gt;"));
        assert!(!html.contains("<Principal>"));
        assert!(html.contains("\"2024-01\""));
    }

    #[test]
    fn test_failed_clinical_section_renders_inline() {
        let html = HtmlPresenter.render(&report("never")).unwrap();

        assert!(html.contains("Section unavailable"));
        assert!(!html.contains("id=\"monthlyChart\""));
        assert!(html.contains("id=\"protocolChart\""));
        assert!(html.contains("\"monthly\":null"));
    }

    #[test]
    fn test_render_load_error() {
        let err = LoadError::MissingFiles(vec![PathBuf::from("governance.csv")]);
        let html = HtmlPresenter.render_load_error(&err);

        assert!(html.contains(LOAD_ERROR_TITLE));
        assert!(html.contains("governance.csv"));
        assert!(!html.contains("id=\"protocolChart\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
