//! Report generation.
//!
//! This module renders aggregation results as plain text for the
//! terminal or as JSON for downstream tooling.

use crate::models::{AggregateReport, Aggregation, NameSummary, ReportMetadata};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate a plain-text report.
pub fn generate_text_report(report: &AggregateReport) -> String {
    let mut output = String::new();

    if let Some(ref outcome) = report.outcome {
        output.push_str(&generate_outcome_section(outcome));
    }

    output.push_str(&generate_summary_section(&report.summaries));

    output
}

/// Generate the outcome line(s) for a single target.
fn generate_outcome_section(outcome: &Aggregation) -> String {
    let mut section = String::new();

    section.push_str(&format!("{}\n", outcome));
    if let Aggregation::Found { count, total, .. } = outcome {
        section.push_str(&format!(
            "  ({} matching records, total {})\n",
            count, total
        ));
    }

    section
}

/// Generate the per-name table.
fn generate_summary_section(summaries: &[NameSummary]) -> String {
    if summaries.is_empty() {
        return String::new();
    }

    let width = summaries
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut section = String::new();

    section.push_str("\nScores by name:\n\n");
    section.push_str(&format!(
        "  {:<width$}  {:>5}  {:>8}  {:>7}\n",
        "Name",
        "Count",
        "Total",
        "Average",
        width = width
    ));
    section.push_str(&format!(
        "  {}  {}  {}  {}\n",
        "-".repeat(width),
        "-".repeat(5),
        "-".repeat(8),
        "-".repeat(7)
    ));

    for summary in summaries {
        section.push_str(&format!(
            "  {:<width$}  {:>5}  {:>8}  {:>7}\n",
            summary.name,
            summary.count,
            summary.total,
            summary.average,
            width = width
        ));
    }

    section
}

/// Render the metadata block shown in verbose mode.
pub fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    format!(
        "scoreagg v{} | source: {} | records: {} | {}\n",
        metadata.tool_version,
        metadata.source,
        metadata.record_count,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AggregateReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            tool_version: "1.0.0".to_string(),
            generated_at: Utc::now(),
            source: "sample".to_string(),
            record_count: 4,
        }
    }

    fn found_report() -> AggregateReport {
        AggregateReport {
            metadata: metadata(),
            outcome: Some(Aggregation::Found {
                target: "Alice".to_string(),
                count: 2,
                total: 183,
                average: 91,
            }),
            summaries: Vec::new(),
        }
    }

    #[test]
    fn test_text_report_found() {
        let text = generate_text_report(&found_report());

        assert!(text.starts_with("Average score for Alice is: 91\n"));
        assert!(text.contains("2 matching records, total 183"));
        assert!(!text.contains("Scores by name"));
    }

    #[test]
    fn test_text_report_not_found() {
        let report = AggregateReport {
            outcome: Some(Aggregation::NotFound {
                target: "Dave".to_string(),
            }),
            ..found_report()
        };

        let text = generate_text_report(&report);
        assert_eq!(text, "An error occurred: no records found for 'Dave'\n");
    }

    #[test]
    fn test_text_report_with_summaries() {
        let report = AggregateReport {
            outcome: None,
            summaries: vec![
                NameSummary {
                    name: "Bob".to_string(),
                    count: 1,
                    total: 92,
                    average: 92,
                },
                NameSummary {
                    name: "Charlie".to_string(),
                    count: 1,
                    total: 76,
                    average: 76,
                },
            ],
            ..found_report()
        };

        let text = generate_text_report(&report);

        assert!(text.contains("Scores by name:"));
        assert!(text.contains("Name     Count"));
        assert!(text.contains("Charlie"));
        assert!(!text.contains("Average score for"));
    }

    #[test]
    fn test_metadata_section() {
        let section = generate_metadata_section(&metadata());
        assert!(section.contains("scoreagg v1.0.0"));
        assert!(section.contains("source: sample"));
        assert!(section.contains("records: 4"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&found_report()).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"status\": \"found\""));
        assert!(json.contains("\"average\": 91"));
        assert!(!json.contains("\"summaries\""));
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        write_report("Average score for Bob is: 92\n", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Average score for Bob is: 92\n");
    }
}
