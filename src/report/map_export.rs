//! GeoJSON map layer: one colour-coded point per resolved district

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::pipeline::ReportRecord;

/// Build a GeoJSON `FeatureCollection`.
///
/// Records with a fallback coordinate are left out so placeholders never
/// show up as real locations.
pub fn build_geojson(records: &[ReportRecord]) -> Value {
    let features: Vec<Value> = records
        .iter()
        .filter(|r| r.location.resolved)
        .map(|r| {
            let coord = r.location.coordinate;
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [coord.longitude, coord.latitude],
                },
                "properties": {
                    "sequence": r.sequence,
                    "district": r.district,
                    "risk_tier": r.tier.to_string(),
                    "marker_color": r.tier.marker_color(),
                    "hex_color": r.tier.hex_color(),
                    "popup": format!(
                        "{}\nRisk: {}\n{}",
                        r.district,
                        r.tier,
                        r.recommendations.join("; ")
                    ),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write the map layer to `output_path`
pub fn export_geojson(records: &[ReportRecord], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&build_geojson(records))
        .context("Failed to serialize map layer")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write map layer to {}", output_path.display()))?;

    Ok(())
}
