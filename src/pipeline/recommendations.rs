//! Tier-level intervention recommendations
//!
//! Recommendations are policy per risk tier, not tailored per record. They
//! are loaded from a JSON knowledge base so a locale is a data swap.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::error::KnowledgeBaseError;
use super::risk::RiskTier;

const ENGLISH: &str = include_str!("../../data/recommendations/en.json");
const INDONESIAN: &str = include_str!("../../data/recommendations/id.json");

/// Joins recommendation statements inside one exported CSV cell, so no
/// statement may contain it
pub const RECOMMENDATION_SEPARATOR: &str = " | ";

/// Locales with an embedded knowledge base
pub const BUILTIN_LOCALES: [&str; 2] = ["en", "id"];

#[derive(Debug, Deserialize)]
struct KnowledgeBaseFile {
    locale: String,
    tiers: BTreeMap<RiskTier, Vec<String>>,
}

/// One non-empty, ordered recommendation list per risk tier
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationBook {
    locale: String,
    low: Vec<String>,
    moderate: Vec<String>,
    high: Vec<String>,
}

impl RecommendationBook {
    /// Embedded knowledge base for `locale` (`en` or `id`)
    pub fn builtin(locale: &str) -> Option<std::result::Result<Self, KnowledgeBaseError>> {
        match locale {
            "en" => Some(Self::from_json(ENGLISH)),
            "id" => Some(Self::from_json(INDONESIAN)),
            _ => None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge base: {}", path.display()))?;
        let book = Self::from_json(&json)
            .with_context(|| format!("Invalid knowledge base: {}", path.display()))?;
        log::info!(
            "Loaded '{}' recommendations from {}",
            book.locale,
            path.display()
        );
        Ok(book)
    }

    /// Parse a knowledge base; every tier must have at least one non-blank
    /// statement, and no statement may contain [`RECOMMENDATION_SEPARATOR`].
    pub fn from_json(json: &str) -> std::result::Result<Self, KnowledgeBaseError> {
        let mut file: KnowledgeBaseFile = serde_json::from_str(json)?;

        let mut take = |tier: RiskTier| -> std::result::Result<Vec<String>, KnowledgeBaseError> {
            let statements = file
                .tiers
                .remove(&tier)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| KnowledgeBaseError::MissingTier(tier.to_string()))?;
            if let Some(index) = statements.iter().position(|s| s.trim().is_empty()) {
                return Err(KnowledgeBaseError::BlankStatement {
                    tier: tier.to_string(),
                    index: index + 1,
                });
            }
            if let Some(index) = statements
                .iter()
                .position(|s| s.contains(RECOMMENDATION_SEPARATOR))
            {
                return Err(KnowledgeBaseError::ContainsSeparator {
                    tier: tier.to_string(),
                    index: index + 1,
                    separator: RECOMMENDATION_SEPARATOR,
                });
            }
            Ok(statements)
        };

        let low = take(RiskTier::Low)?;
        let moderate = take(RiskTier::Moderate)?;
        let high = take(RiskTier::High)?;

        Ok(Self {
            locale: file.locale,
            low,
            moderate,
            high,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Recommendations for `tier`, in their defined order
    pub fn recommend(&self, tier: RiskTier) -> &[String] {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Moderate => &self.moderate,
            RiskTier::High => &self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_locales_load() {
        for locale in BUILTIN_LOCALES {
            let book = RecommendationBook::builtin(locale).unwrap().unwrap();
            assert_eq!(book.locale(), locale);
        }
        assert!(RecommendationBook::builtin("fr").is_none());
    }

    #[test]
    fn test_locales_share_list_lengths() {
        let en = RecommendationBook::builtin("en").unwrap().unwrap();
        let id = RecommendationBook::builtin("id").unwrap().unwrap();
        for tier in RiskTier::ALL {
            assert_eq!(en.recommend(tier).len(), id.recommend(tier).len());
        }
    }
}
