//! Plain-text rendering for terminals.

use crate::page::*;
use crate::{format_quantity, Presenter, RenderResult};
use health_perf_analytics::DashboardReport;
use health_perf_ingestion::LoadError;
use std::fmt::Write;

/// Renders the report as aligned text tables.
pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn render(&self, report: &DashboardReport) -> RenderResult<String> {
        let mut out = String::new();
        push_heading(&mut out, PAGE_TITLE, '=');
        out.push_str(PAGE_INTRO);
        out.push('\n');
        let _ = writeln!(
            out,
            "Generated {}, data loaded {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.data_loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        let governance = &report.governance;
        out.push('\n');
        push_heading(&mut out, GOVERNANCE_HEADING, '-');
        out.push_str(GOVERNANCE_NOTE);
        out.push_str("\n\n");
        out.push_str(&table(
            &["Protocol status", "Facilities"],
            governance
                .protocol_counts
                .iter()
                .map(|c| vec![c.category.clone(), c.count.to_string()])
                .collect(),
        ));
        let _ = writeln!(
            out,
            "\n{} ({})",
            COMPLIANT_TABLE_TITLE,
            governance.compliant_facilities.len()
        );
        out.push_str(&table(
            &["Facility", "District", "Tier"],
            governance
                .compliant_facilities
                .iter()
                .map(|f| vec![f.facility_name.clone(), f.district.clone(), f.tier_level.clone()])
                .collect(),
        ));

        out.push('\n');
        push_heading(&mut out, CLINICAL_HEADING, '-');
        match &report.clinical {
            Ok(clinical) => {
                let _ = writeln!(out, "{}", MONTHLY_CHART_TITLE);
                out.push_str(&table(
                    &["Month", "Live births"],
                    clinical
                        .monthly_trend
                        .iter()
                        .map(|p| vec![p.month.to_string(), p.live_births.to_string()])
                        .collect(),
                ));
                if clinical.dropped_rows > 0 {
                    let _ = writeln!(
                        out,
                        "({} rows with an unreadable reporting month left out)",
                        clinical.dropped_rows
                    );
                }
                let _ = writeln!(out, "\n{}", DISTRICT_CHART_TITLE);
                out.push_str(&table(
                    &["District", "Live births"],
                    clinical
                        .births_by_district
                        .iter()
                        .map(|d| vec![d.district.clone(), d.live_births.to_string()])
                        .collect(),
                ));
            }
            Err(e) => {
                let _ = writeln!(out, "Section unavailable: {}", e);
            }
        }

        out.push('\n');
        push_heading(&mut out, OPERATIONS_HEADING, '-');
        let _ = writeln!(out, "{}", OXYGEN_CHART_TITLE);
        out.push_str(&table(
            &["Facility", "Oxygen cylinders"],
            report
                .operations
                .top_oxygen
                .iter()
                .map(|o| vec![o.facility_name.clone(), format_quantity(o.oxygen_cylinders_available)])
                .collect(),
        ));

        Ok(out)
    }

    fn render_load_error(&self, error: &LoadError) -> String {
        format!("{}: {}\n", LOAD_ERROR_TITLE, error)
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}

fn push_heading(out: &mut String, title: &str, underline: char) {
    out.push_str(title);
    out.push('\n');
    out.extend(std::iter::repeat(underline).take(title.chars().count()));
    out.push('\n');
}

/// Left-aligned columns sized to the widest cell.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_perf_ingestion::{
        ClinicalRecord, DataSnapshot, Facility, GovernanceRecord, OperationsRecord,
    };

    #[test]
    fn test_render_text_report() {
        let snapshot = DataSnapshot::new(
            vec![
                Facility::new("1", "X", "North", "T1"),
                Facility::new("2", "Y", "South", "T2"),
            ],
            vec![
                ClinicalRecord::new("1", "2024-01", 10),
                ClinicalRecord::new("1", "2024-01", 5),
            ],
            vec![GovernanceRecord::new("1", "Yes")],
            vec![OperationsRecord::new("1", 5.0), OperationsRecord::new("2", 0.0)],
        )
        .unwrap();
        let text = TextPresenter.render(&DashboardReport::build(&snapshot)).unwrap();

        assert!(text.contains(GOVERNANCE_HEADING));
        assert!(text.contains("  2024-01  15\n"));
        assert!(text.contains("  North     15\n"));
        let x = text.find("  X  ").unwrap();
        let y = text.find("  Y  ").unwrap();
        assert!(x < y);
    }

    #[test]
    fn test_table_alignment() {
        let rendered = table(
            &["Name", "N"],
            vec![
                vec!["Long facility".to_string(), "1".to_string()],
                vec!["B".to_string(), "22".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "  Name           N");
        assert_eq!(lines[2], "  Long facility  1");
        assert_eq!(lines[3], "  B              22");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(table(&["A"], Vec::new()), "  (none)\n");
    }
}
