//! Report assembly: validation, classification, recommendations, coordinates
//!
//! A run is all-or-nothing at the batch level (missing columns abort before
//! any row is classified) and best-effort at the row level (a row that
//! cannot be classified is reported as a [`RowError`] and skipped).

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::aliases::{AppliedAlias, ColumnAliases};
use super::classifier::RiskClassifier;
use super::error::{ArtifactMismatchError, PipelineError, RowError, RowFailure};
use super::geo::{GeoRegistry, ResolvedCoordinate};
use super::recommendations::RecommendationBook;
use super::risk::RiskTier;
use super::schema::{FeatureSchema, Indicators};
use super::validator::{validate_schema, ValidatedTable};

/// How output sequence numbers are assigned when rows fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Keep the 1-based input row position; failed rows leave gaps
    #[default]
    InputPosition,
    /// Number successful records 1..N
    Renumbered,
}

impl std::fmt::Display for SequencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequencePolicy::InputPosition => write!(f, "input position"),
            SequencePolicy::Renumbered => write!(f, "renumbered"),
        }
    }
}

/// One classified district
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    /// 1-based sequence number (see [`SequencePolicy`])
    pub sequence: usize,
    /// 1-based input row
    pub row: usize,
    pub district: String,
    pub indicators: Indicators,
    pub tier: RiskTier,
    pub recommendations: Vec<String>,
    pub location: ResolvedCoordinate,
}

/// What a run produced, from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The input had no data rows
    Empty,
    /// Every row produced a record
    Complete,
    /// Some rows failed
    Partial { failed: usize, total: usize },
    /// Every row failed
    NoRecords { total: usize },
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct RiskReport {
    pub records: Vec<ReportRecord>,
    pub errors: Vec<RowError>,
    pub total_rows: usize,
    pub applied_aliases: Vec<AppliedAlias>,
}

impl RiskReport {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.total_rows == 0 {
            BatchOutcome::Empty
        } else if self.errors.is_empty() {
            BatchOutcome::Complete
        } else if self.records.is_empty() {
            BatchOutcome::NoRecords {
                total: self.total_rows,
            }
        } else {
            BatchOutcome::Partial {
                failed: self.errors.len(),
                total: self.total_rows,
            }
        }
    }

    /// Record count per tier; every tier is present, possibly with zero
    pub fn tier_counts(&self) -> BTreeMap<RiskTier, usize> {
        let mut counts: BTreeMap<RiskTier, usize> =
            RiskTier::ALL.iter().map(|t| (*t, 0)).collect();
        for record in &self.records {
            *counts.entry(record.tier).or_default() += 1;
        }
        counts
    }

    /// Records whose district is not in the coordinate registry
    pub fn unresolved(&self) -> Vec<&ReportRecord> {
        self.records
            .iter()
            .filter(|r| !r.location.resolved)
            .collect()
    }
}

/// Load-once collaborators shared by every run
pub struct PipelineContext {
    schema: FeatureSchema,
    aliases: ColumnAliases,
    classifier: Box<dyn RiskClassifier>,
    recommendations: RecommendationBook,
    registry: GeoRegistry,
    sequence_policy: SequencePolicy,
}

impl PipelineContext {
    /// Assemble the context. Fails if the classifier does not consume
    /// exactly the schema's features, so a mismatched artifact can never
    /// serve a run.
    pub fn new(
        schema: FeatureSchema,
        aliases: ColumnAliases,
        classifier: Box<dyn RiskClassifier>,
        recommendations: RecommendationBook,
        registry: GeoRegistry,
    ) -> Result<Self, ArtifactMismatchError> {
        classifier.check_schema(&schema)?;

        Ok(Self {
            schema,
            aliases,
            classifier,
            recommendations,
            registry,
            sequence_policy: SequencePolicy::default(),
        })
    }

    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.sequence_policy = policy;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn aliases(&self) -> &ColumnAliases {
        &self.aliases
    }

    pub fn classifier(&self) -> &dyn RiskClassifier {
        self.classifier.as_ref()
    }

    pub fn recommendations(&self) -> &RecommendationBook {
        &self.recommendations
    }

    pub fn registry(&self) -> &GeoRegistry {
        &self.registry
    }

    pub fn sequence_policy(&self) -> SequencePolicy {
        self.sequence_policy
    }

    /// Resolve aliases and validate the table against the schema
    pub fn validate(
        &self,
        df: &mut DataFrame,
    ) -> Result<(ValidatedTable, Vec<AppliedAlias>), PipelineError> {
        let applied = self.aliases.apply(df, &self.schema)?;
        let table = validate_schema(df, &self.schema)?;
        Ok((table, applied))
    }

    /// Full run over one input table
    pub fn run(&self, mut df: DataFrame) -> Result<RiskReport, PipelineError> {
        let (table, applied) = self.validate(&mut df)?;
        let mut report = self.assemble(&table);
        report.applied_aliases = applied;
        Ok(report)
    }

    /// Classify every validated row. Row failures are collected, never
    /// propagated.
    pub fn assemble(&self, table: &ValidatedTable) -> RiskReport {
        let mut records = Vec::with_capacity(table.len());
        let mut errors = Vec::new();

        for input in &table.records {
            let district = match &input.district {
                Some(district) => district,
                None => {
                    log::warn!("Row {}: district identifier is missing", input.row);
                    errors.push(RowError {
                        row: input.row,
                        district: None,
                        failure: RowFailure::MissingDistrict,
                    });
                    continue;
                }
            };

            let tier = match self.classifier.classify(input.indicators.as_slice()) {
                Ok(tier) => tier,
                Err(e) => {
                    log::warn!("Row {} ({}): {}", input.row, district, e);
                    errors.push(RowError {
                        row: input.row,
                        district: Some(district.clone()),
                        failure: e.into(),
                    });
                    continue;
                }
            };

            let location = self.registry.resolve(district);
            if !location.resolved {
                log::warn!(
                    "District '{}' is not in the {} registry; using fallback coordinate",
                    district,
                    self.registry.region()
                );
            }

            let sequence = match self.sequence_policy {
                SequencePolicy::InputPosition => input.row,
                SequencePolicy::Renumbered => records.len() + 1,
            };

            log::debug!("Row {} ({}): {}", input.row, district, tier);
            records.push(ReportRecord {
                sequence,
                row: input.row,
                district: district.clone(),
                indicators: input.indicators,
                tier,
                recommendations: self.recommendations.recommend(tier).to_vec(),
                location,
            });
        }

        RiskReport {
            records,
            errors,
            total_rows: table.len(),
            applied_aliases: Vec::new(),
        }
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("schema", &self.schema)
            .field("model_version", &self.classifier.model_version())
            .field("locale", &self.recommendations.locale())
            .field("region", &self.registry.region())
            .field("sequence_policy", &self.sequence_policy)
            .finish()
    }
}

