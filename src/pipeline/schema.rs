//! Feature schema: the canonical, ordered set of indicator columns
//!
//! The classifier consumes the nine indicators in exactly the order of
//! [`Indicator::ALL`]. The district identifier column is configurable so that
//! data producers using a localized header can be accepted without aliasing.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Version tag shared by the schema and compatible model artifacts
pub const FEATURE_SCHEMA_VERSION: &str = "dengue-features/1";

/// Default name of the district identifier column
pub const DEFAULT_DISTRICT_COLUMN: &str = "district";

/// One numeric indicator of the feature schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    DengueCases,
    Rainfall,
    IllegalDumpSites,
    AvgTemperature,
    FoggingEvents,
    WaterPuddles,
    Humidity,
    UnemploymentRate,
    EducationYears,
}

impl Indicator {
    /// Canonical feature order
    pub const ALL: [Indicator; 9] = [
        Indicator::DengueCases,
        Indicator::Rainfall,
        Indicator::IllegalDumpSites,
        Indicator::AvgTemperature,
        Indicator::FoggingEvents,
        Indicator::WaterPuddles,
        Indicator::Humidity,
        Indicator::UnemploymentRate,
        Indicator::EducationYears,
    ];

    /// Canonical column name
    pub fn column(&self) -> &'static str {
        match self {
            Indicator::DengueCases => "dengue_cases",
            Indicator::Rainfall => "rainfall",
            Indicator::IllegalDumpSites => "illegal_dump_sites",
            Indicator::AvgTemperature => "avg_temperature",
            Indicator::FoggingEvents => "fogging_events",
            Indicator::WaterPuddles => "water_puddles",
            Indicator::Humidity => "humidity",
            Indicator::UnemploymentRate => "unemployment_rate",
            Indicator::EducationYears => "education_years",
        }
    }

    /// Human-readable label for detail panels
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::DengueCases => "Dengue Cases",
            Indicator::Rainfall => "Rainfall",
            Indicator::IllegalDumpSites => "Illegal Dump Sites",
            Indicator::AvgTemperature => "Average Temperature",
            Indicator::FoggingEvents => "Fogging Events",
            Indicator::WaterPuddles => "Water Puddles",
            Indicator::Humidity => "Humidity",
            Indicator::UnemploymentRate => "Unemployment",
            Indicator::EducationYears => "Education Level",
        }
    }

    /// Display unit, if any
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Indicator::Rainfall => Some("mm"),
            Indicator::AvgTemperature => Some("°C"),
            Indicator::Humidity | Indicator::UnemploymentRate => Some("%"),
            Indicator::EducationYears => Some("years on average"),
            _ => None,
        }
    }

    /// Position in the canonical feature vector
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The nine indicator values of one input row, in canonical order.
///
/// Cells that were empty or not numeric are stored as `NaN`; the classifier
/// rejects them rather than substituting a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators(pub [f64; 9]);

impl Indicators {
    pub fn get(&self, indicator: Indicator) -> f64 {
        self.0[indicator.index()]
    }

    /// Feature vector in canonical order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

// Serialized as a column-name keyed map
impl Serialize for Indicators {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Indicator::ALL.len()))?;
        for indicator in Indicator::ALL {
            map.serialize_entry(indicator.column(), &self.get(indicator))?;
        }
        map.end()
    }
}

/// Required input columns: the district identifier plus the indicators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    district_column: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRICT_COLUMN)
    }
}

impl FeatureSchema {
    pub fn new(district_column: impl Into<String>) -> Self {
        Self {
            district_column: district_column.into(),
        }
    }

    pub fn version(&self) -> &'static str {
        FEATURE_SCHEMA_VERSION
    }

    pub fn district_column(&self) -> &str {
        &self.district_column
    }

    /// Indicator columns in canonical order
    pub fn feature_columns(&self) -> Vec<&'static str> {
        Indicator::ALL.iter().map(|i| i.column()).collect()
    }

    pub fn arity(&self) -> usize {
        Indicator::ALL.len()
    }

    /// Every column that must be present: the indicators followed by the
    /// district column
    pub fn required_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Indicator::ALL.iter().map(|i| i.column()).collect();
        columns.push(self.district_column.as_str());
        columns
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required_columns().contains(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_order() {
        let schema = FeatureSchema::default();
        let required = schema.required_columns();

        assert_eq!(required.len(), 10);
        assert_eq!(required[0], "dengue_cases");
        assert_eq!(required[8], "education_years");
        assert_eq!(required[9], "district");
    }

    #[test]
    fn test_custom_district_column() {
        let schema = FeatureSchema::new("kecamatan");
        assert!(schema.is_required("kecamatan"));
        assert!(!schema.is_required("district"));
    }

    #[test]
    fn test_indicator_index_matches_canonical_order() {
        for (i, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(indicator.index(), i);
        }
    }
}
