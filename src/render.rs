//! Presentation of [`SchemaReport`]s: console text, JSON and YAML.
//!
//! Nothing here feeds back into classification; the renderers only read the
//! report fields.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::{
    cli::ReportFormat,
    data::format_number,
    report::SchemaReport,
    roles::SemanticRole,
    rules::RuleFinding,
    table,
};

const RULE_WIDTH: usize = 100;
const CELL_WIDTH: usize = 40;

pub fn render_reports(reports: &[SchemaReport], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Table => Ok(reports.iter().map(render_text).collect::<String>()),
        ReportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(reports).context("Serializing reports as JSON")?;
            json.push('\n');
            Ok(json)
        }
        ReportFormat::Yaml => serde_yaml::to_string(reports).context("Serializing reports as YAML"),
    }
}

pub fn render_text(report: &SchemaReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "FILE: {}", report.file_label());
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Data rows: {}", report.row_count());
    let _ = writeln!(out, "Total columns: {}", report.column_count());
    let _ = writeln!(out);

    let _ = writeln!(out, "COLUMN ANALYSIS");
    let headers = [
        "role", "column", "#", "keywords", "sample", "distinct", "min", "max", "mean",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for classification in report.classifications().values() {
        for candidate in classification.candidates() {
            let profile = &candidate.profile;
            let (min, max, mean) = match &profile.numeric {
                Some(summary) => (
                    format_number(summary.min),
                    format_number(summary.max),
                    format!("{:.2}", summary.mean),
                ),
                None => Default::default(),
            };
            let sample = if classification.role() == SemanticRole::Status {
                profile.distinct_preview.join(", ")
            } else {
                profile.sample.clone().unwrap_or_else(|| "N/A".to_string())
            };
            rows.push(vec![
                classification.role().to_string(),
                candidate.column.clone(),
                (candidate.position + 1).to_string(),
                candidate.matched_keywords.join(","),
                sample,
                profile.distinct.to_string(),
                min,
                max,
                mean,
            ]);
        }
    }
    if rows.is_empty() {
        let _ = writeln!(out, "  No column matched any role keyword.");
    } else {
        out.push_str(&table::render_table(&headers, &rows, Some(CELL_WIDTH)));
    }
    let _ = writeln!(out);

    for (name, finding) in report.rule_findings() {
        match finding {
            RuleFinding::Fulfillment(f) => {
                let stars = "*".repeat(RULE_WIDTH);
                let _ = writeln!(out, "{stars}");
                let _ = writeln!(out, "RULE {name}: '{}' column found", f.column);
                let _ = writeln!(out, "{stars}");
                match f.role.parent() {
                    Some(parent) => {
                        let _ = writeln!(
                            out,
                            "  Role: {} (narrows {})",
                            f.role.title(),
                            parent.title()
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  Role: {}", f.role.title());
                    }
                }
                let _ = writeln!(out, "  Total rows: {}", f.total);
                let _ = writeln!(
                    out,
                    "  Rows where {} = 0 (fulfilled, SKIP): {} ({:.1}%)",
                    f.column, f.zero_count, f.percent_zero
                );
                let _ = writeln!(
                    out,
                    "  Rows where {} > 0 (pending, INCLUDE): {} ({:.1}%)",
                    f.column, f.positive_count, f.percent_positive
                );
                if f.unclassified_count() > 0 {
                    let _ = writeln!(
                        out,
                        "  Rows without a usable quantity: {}",
                        f.unclassified_count()
                    );
                }
                let _ = writeln!(out, "  ACTION: {}", f.policy);
                let _ = writeln!(out);
            }
        }
    }

    let _ = writeln!(out, "RECOMMENDATIONS");
    for (role, classification) in report.classifications() {
        match classification.chosen() {
            Some(candidate) => {
                let _ = writeln!(
                    out,
                    "  {}: Use column '{}'",
                    role.title(),
                    candidate.column
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {}: Not clearly identified - manual review needed",
                    role.title()
                );
            }
        }
    }
    let _ = writeln!(out);
    out
}
