//! Risk tier enumeration

use serde::{Deserialize, Serialize};

/// Outbreak-risk classification, ordered by severity (`Low < Moderate < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// All tiers in ascending severity.
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Moderate, RiskTier::High];

    /// Decode a classifier label. Accepts the English tier names and the
    /// Indonesian labels (`Rendah`, `Sedang`, `Tinggi`) the dengue models are
    /// trained with. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" | "Rendah" => Some(RiskTier::Low),
            "Moderate" | "Sedang" => Some(RiskTier::Moderate),
            "High" | "Tinggi" => Some(RiskTier::High),
            _ => None,
        }
    }

    /// Marker colour used on the map layer.
    pub fn marker_color(&self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Moderate => "orange",
            RiskTier::High => "red",
        }
    }

    /// Hex colour for HTML-capable consumers.
    pub fn hex_color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#5cb85c",
            RiskTier::Moderate => "#f0ad4e",
            RiskTier::High => "#d9534f",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Moderate => write!(f, "Moderate"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskTier::from_label(s.trim()).ok_or_else(|| {
            format!(
                "Unknown risk tier: '{}'. Use 'Low', 'Moderate' or 'High'.",
                s
            )
        })
    }
}
