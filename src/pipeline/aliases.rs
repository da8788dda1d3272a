//! Column alias resolution
//!
//! Data producers name the same indicator differently (the Bandung health
//! office exports use Indonesian headers). Aliases are renamed to their
//! canonical names before validation so the validator itself stays exact.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::AliasError;
use super::schema::FeatureSchema;

const DEFAULT_ALIASES: &str = include_str!("../../data/aliases.json");

/// Declarative `alias -> canonical` column mapping
#[derive(Debug, Clone, Default)]
pub struct ColumnAliases {
    aliases: BTreeMap<String, String>,
}

/// A rename that was applied to the input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedAlias {
    pub from: String,
    pub to: String,
}

impl ColumnAliases {
    /// The built-in Indonesian header aliases
    pub fn builtin() -> std::result::Result<Self, AliasError> {
        Self::from_json(DEFAULT_ALIASES)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, AliasError> {
        let aliases: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_map(aliases)
    }

    pub fn from_map(aliases: BTreeMap<String, String>) -> std::result::Result<Self, AliasError> {
        if let Some((alias, _)) = aliases.iter().find(|(alias, canonical)| alias == canonical) {
            return Err(AliasError::SelfMapping {
                alias: alias.clone(),
            });
        }
        Ok(Self { aliases })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias table: {}", path.display()))?;
        let aliases = Self::from_json(&json)
            .with_context(|| format!("Invalid alias table: {}", path.display()))?;
        log::info!("Loaded {} column alias(es) from {}", aliases.len(), path.display());
        Ok(aliases)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    /// Rename alias columns of `df` to their canonical names.
    ///
    /// Only aliases targeting a column the schema requires are considered.
    /// When both the alias and the canonical column exist, the canonical
    /// column is kept and the alias column is left as an ignored extra.
    pub fn apply(
        &self,
        df: &mut DataFrame,
        schema: &FeatureSchema,
    ) -> PolarsResult<Vec<AppliedAlias>> {
        let mut present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut applied = Vec::new();
        for (alias, canonical) in &self.aliases {
            if !schema.is_required(canonical) || schema.is_required(alias) {
                continue;
            }
            if !present.contains(alias) {
                continue;
            }
            if present.contains(canonical) {
                log::warn!(
                    "Both '{}' and its alias '{}' are present; using '{}'",
                    canonical,
                    alias,
                    canonical
                );
                continue;
            }

            df.rename(alias, canonical.as_str().into())?;
            log::debug!("Renamed column '{}' -> '{}'", alias, canonical);
            present.push(canonical.clone());
            applied.push(AppliedAlias {
                from: alias.clone(),
                to: canonical.clone(),
            });
        }

        Ok(applied)
    }
}
