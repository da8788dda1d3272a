//! District geocoordinate registry

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::RegistryError;

const BANDUNG: &str = include_str!("../../data/coordinates/bandung.json");

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Result of a registry lookup. `resolved` is false when `coordinate` is the
/// fallback placeholder rather than a real location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedCoordinate {
    pub coordinate: Coordinate,
    pub resolved: bool,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    region: String,
    #[serde(default)]
    fallback: Option<Coordinate>,
    districts: HashMap<String, Coordinate>,
}

/// Static district name -> coordinate mapping with a fallback
#[derive(Debug, Clone)]
pub struct GeoRegistry {
    region: String,
    fallback: Coordinate,
    districts: HashMap<String, Coordinate>,
}

impl GeoRegistry {
    /// The 30 kecamatan of Kota Bandung
    pub fn builtin() -> std::result::Result<Self, RegistryError> {
        Self::from_json(BANDUNG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read coordinate registry: {}", path.display()))?;
        let registry = Self::from_json(&json)
            .with_context(|| format!("Invalid coordinate registry: {}", path.display()))?;
        log::info!(
            "Loaded {} district coordinate(s) for {}",
            registry.len(),
            registry.region
        );
        Ok(registry)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let fallback = file.fallback.unwrap_or_default();

        let fallback_entry = ("<fallback>".to_string(), fallback);
        let out_of_range = file
            .districts
            .iter()
            .chain(std::iter::once((&fallback_entry.0, &fallback_entry.1)))
            .find(|(_, c)| !c.in_range());
        if let Some((district, coord)) = out_of_range {
            return Err(RegistryError::OutOfRange {
                district: district.clone(),
                latitude: coord.latitude,
                longitude: coord.longitude,
            });
        }

        Ok(Self {
            region: file.region,
            fallback,
            districts: file.districts,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Exact-name lookup. Unknown districts get the fallback with
    /// `resolved = false`; this never fails.
    pub fn resolve(&self, district: &str) -> ResolvedCoordinate {
        match self.districts.get(district) {
            Some(coordinate) => ResolvedCoordinate {
                coordinate: *coordinate,
                resolved: true,
            },
            None => ResolvedCoordinate {
                coordinate: self.fallback,
                resolved: false,
            },
        }
    }
}
