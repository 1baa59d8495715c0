use anyhow::Result;
use std::fmt::Write;

use crate::types::EvaluationReport;

/// Plain-text rendering: a categorization and a scoring section per dimension.
pub fn render_report(report: &EvaluationReport) -> Result<String> {
    let mut out = String::new();
    for (key, result) in report.iter() {
        let label = key.label();
        writeln!(out, "## {label} Categorization")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&result.categorized)?)?;
        writeln!(out)?;
        writeln!(out, "## {label} Scoring")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&result.score)?)?;
        writeln!(out)?;
    }
    Ok(out)
}
