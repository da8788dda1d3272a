//! JSON report export

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ReportRecord, RiskReport, RiskTier, SequencePolicy};

/// Metadata about the classification run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Aedes version
    pub aedes_version: String,
    pub input_file: String,
    pub model_version: String,
    /// Locale of the recommendation knowledge base
    pub locale: String,
    /// Region of the coordinate registry
    pub region: String,
    pub sequence_policy: SequencePolicy,
}

/// Summary counts of the run
#[derive(Debug, Serialize)]
pub struct RunCounts {
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tier_counts: BTreeMap<RiskTier, usize>,
    pub unresolved_districts: Vec<String>,
}

/// A failed row
#[derive(Debug, Serialize)]
pub struct RowErrorEntry {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub reason: String,
}

/// Complete JSON report
#[derive(Debug, Serialize)]
pub struct RiskReportExport<'a> {
    pub metadata: RunMetadata,
    pub summary: RunCounts,
    pub records: &'a [ReportRecord],
    pub errors: Vec<RowErrorEntry>,
}

/// Parameters for the report metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub model_version: &'a str,
    pub locale: &'a str,
    pub region: &'a str,
    pub sequence_policy: SequencePolicy,
}

/// Assemble the serializable report
pub fn build_report_export<'a>(report: &'a RiskReport, params: &ExportParams) -> RiskReportExport<'a> {
    let errors = report
        .errors
        .iter()
        .map(|e| RowErrorEntry {
            row: e.row,
            district: e.district.clone(),
            reason: e.failure.to_string(),
        })
        .collect();

    RiskReportExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            aedes_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            model_version: params.model_version.to_string(),
            locale: params.locale.to_string(),
            region: params.region.to_string(),
            sequence_policy: params.sequence_policy,
        },
        summary: RunCounts {
            total_rows: report.total_rows,
            succeeded: report.succeeded(),
            failed: report.failed(),
            tier_counts: report.tier_counts(),
            unresolved_districts: report
                .unresolved()
                .iter()
                .map(|r| r.district.clone())
                .collect(),
        },
        records: &report.records,
        errors,
    }
}

/// Export the run to a pretty-printed JSON file
pub fn export_report_json(report: &RiskReport, params: &ExportParams, output_path: &Path) -> Result<()> {
    let export = build_report_export(report, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize risk report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write risk report to {}", output_path.display()))?;

    Ok(())
}
