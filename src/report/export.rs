//! CSV export of classified districts
//!
//! One row per successful record:
//! `No,district,risk_tier,recommendations[,latitude,longitude,coordinate_resolved]`.
//! Recommendations are joined with [`RECOMMENDATION_SEPARATOR`] in their
//! defined order.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{
    Coordinate, ReportRecord, ResolvedCoordinate, RiskTier, RECOMMENDATION_SEPARATOR,
};

/// File name used when the export path is derived or bundled
pub const DEFAULT_EXPORT_NAME: &str = "dengue_risk_predictions.csv";

const COL_SEQUENCE: &str = "No";
const COL_DISTRICT: &str = "district";
const COL_TIER: &str = "risk_tier";
const COL_RECOMMENDATIONS: &str = "recommendations";
const COL_LATITUDE: &str = "latitude";
const COL_LONGITUDE: &str = "longitude";
const COL_RESOLVED: &str = "coordinate_resolved";

/// A row parsed back from an export file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub sequence: usize,
    pub district: String,
    pub tier: RiskTier,
    pub recommendations: Vec<String>,
    /// Present only when the export included coordinates
    pub location: Option<ResolvedCoordinate>,
}

/// Build the export table. Coordinates are dropped unless requested.
pub fn build_export_frame(records: &[ReportRecord], include_coordinates: bool) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new(
            COL_SEQUENCE.into(),
            records.iter().map(|r| r.sequence as u64).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_DISTRICT.into(),
            records.iter().map(|r| r.district.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_TIER.into(),
            records.iter().map(|r| r.tier.to_string()).collect::<Vec<_>>(),
        ),
        Column::new(
            COL_RECOMMENDATIONS.into(),
            records
                .iter()
                .map(|r| r.recommendations.join(RECOMMENDATION_SEPARATOR))
                .collect::<Vec<_>>(),
        ),
    ];

    if include_coordinates {
        columns.push(Column::new(
            COL_LATITUDE.into(),
            records
                .iter()
                .map(|r| r.location.coordinate.latitude)
                .collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            COL_LONGITUDE.into(),
            records
                .iter()
                .map(|r| r.location.coordinate.longitude)
                .collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            COL_RESOLVED.into(),
            records
                .iter()
                .map(|r| r.location.resolved)
                .collect::<Vec<_>>(),
        ));
    }

    DataFrame::new(columns).context("Failed to build export table")
}

/// Serialize records to UTF-8 CSV bytes
pub fn export_csv_bytes(records: &[ReportRecord], include_coordinates: bool) -> Result<Vec<u8>> {
    let mut df = build_export_frame(records, include_coordinates)?;
    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to serialize export CSV")?;
    Ok(buf)
}

/// Write the CSV export to `path`
pub fn write_export_csv(records: &[ReportRecord], include_coordinates: bool, path: &Path) -> Result<()> {
    let bytes = export_csv_bytes(records, include_coordinates)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Parse an export produced by [`export_csv_bytes`]
pub fn parse_export_csv(bytes: &[u8]) -> Result<Vec<ExportRow>> {
    // Read every column as text so district names stay verbatim
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .context("Failed to parse export CSV")?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let has_coordinates = names.iter().any(|n| n == COL_LATITUDE);

    let text = |name: &str| -> Result<Vec<Option<String>>> {
        let column = df
            .column(name)
            .with_context(|| format!("Export is missing column '{}'", name))?;
        Ok(column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect())
    };

    let sequences = text(COL_SEQUENCE)?;
    let districts = text(COL_DISTRICT)?;
    let tiers = text(COL_TIER)?;
    let recommendations = text(COL_RECOMMENDATIONS)?;
    let coordinates = if has_coordinates {
        Some((text(COL_LATITUDE)?, text(COL_LONGITUDE)?, text(COL_RESOLVED)?))
    } else {
        None
    };

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let line = i + 2;
        let sequence = sequences[i]
            .as_deref()
            .unwrap_or_default()
            .parse::<usize>()
            .with_context(|| format!("Line {}: invalid sequence number", line))?;
        let district = districts[i]
            .clone()
            .with_context(|| format!("Line {}: missing district", line))?;
        let tier = tiers[i]
            .as_deref()
            .unwrap_or_default()
            .parse::<RiskTier>()
            .map_err(|e| anyhow::anyhow!("Line {}: {}", line, e))?;
        let recommendations = recommendations[i]
            .as_deref()
            .map(|s| {
                s.split(RECOMMENDATION_SEPARATOR)
                    .map(|r| r.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let location = match &coordinates {
            Some((lat, lon, resolved)) => {
                let parse = |v: &Option<String>, what: &str| -> Result<f64> {
                    v.as_deref()
                        .unwrap_or_default()
                        .parse::<f64>()
                        .with_context(|| format!("Line {}: invalid {}", line, what))
                };
                Some(ResolvedCoordinate {
                    coordinate: Coordinate::new(parse(&lat[i], COL_LATITUDE)?, parse(&lon[i], COL_LONGITUDE)?),
                    resolved: resolved[i].as_deref() == Some("true"),
                })
            }
            None => None,
        };

        rows.push(ExportRow {
            sequence,
            district,
            tier,
            recommendations,
            location,
        });
    }

    Ok(rows)
}

/// Read and parse an export file
pub fn read_export_csv(path: &Path) -> Result<Vec<ExportRow>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;
    parse_export_csv(&bytes)
}
