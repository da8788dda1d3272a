//! Error types for the risk classification pipeline.
//!
//! Errors are split by scope: `SchemaError` aborts a whole batch,
//! `ArtifactMismatchError` and the data-file errors abort startup, and
//! `InferenceError` only ever affects a single row.

use std::fmt;

use thiserror::Error;

/// The input table cannot be processed at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// One or more required columns are absent. Lists every missing column,
    /// in schema order.
    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// A required column is present but its values cannot be read as the
    /// expected type (e.g. a nested list column from a Parquet file).
    #[error("column '{column}' cannot be read as {expected}: {reason}")]
    IncompatibleColumn {
        column: String,
        expected: &'static str,
        reason: String,
    },
}

impl SchemaError {
    /// Names of the missing columns, empty for non-missing-column errors.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { missing } => missing,
            SchemaError::IncompatibleColumn { .. } => &[],
        }
    }
}

/// A batch-level failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to prepare input table: {0}")]
    Data(#[from] polars::prelude::PolarsError),
}

/// The model artifact disagrees with the feature schema or is internally
/// inconsistent. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactMismatchError {
    #[error("artifact schema version '{found}' does not match expected '{expected}'")]
    SchemaVersion { expected: String, found: String },

    #[error("artifact expects {found} feature(s), schema defines {expected}")]
    FeatureArity { expected: usize, found: usize },

    #[error("artifact feature #{position} is '{found}', schema expects '{expected}'")]
    FeatureOrder {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("scaler {field} has {found} value(s), expected {expected}")]
    ScalerShape {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("classifier has {found} class(es) but the label decoder has {expected}")]
    ClassCount { expected: usize, found: usize },

    #[error("artifact defines no classes")]
    NoClasses,

    #[error("coefficient row {row} has {found} value(s), expected {expected}")]
    CoefficientShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("label '{0}' does not decode to a risk tier")]
    UnknownLabel(String),

    #[error("tree {tree}: {message}")]
    InvalidTree { tree: usize, message: String },

    #[error("failed to read model artifact: {0}")]
    Unreadable(String),
}

/// The classifier could not produce a tier for one feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature vector has {actual} value(s), expected {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("feature '{feature}' is missing or not numeric")]
    NonFinite { feature: String },

    #[error("classifier predicted class {class}, decoder has {classes} label(s)")]
    UndecodableClass { class: usize, classes: usize },
}

/// Why a single input row produced no report record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowFailure {
    #[error("district identifier is missing")]
    MissingDistrict,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// A row-scoped diagnostic. `row` is the 1-based position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub district: Option<String>,
    pub failure: RowFailure,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.district {
            Some(district) => write!(f, "row {} ({}): {}", self.row, district, self.failure),
            None => write!(f, "row {}: {}", self.row, self.failure),
        }
    }
}

/// The recommendation knowledge base file is unusable.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("no recommendations defined for tier '{0}'")]
    MissingTier(String),

    #[error("recommendation #{index} for tier '{tier}' is blank")]
    BlankStatement { tier: String, index: usize },

    #[error("recommendation #{index} for tier '{tier}' contains the export separator '{separator}'")]
    ContainsSeparator {
        tier: String,
        index: usize,
        separator: &'static str,
    },

    #[error("invalid knowledge base JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The geocoordinate registry file is unusable.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("coordinate for '{district}' is out of range: ({latitude}, {longitude})")]
    OutOfRange {
        district: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("invalid coordinate registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The column alias table is unusable.
#[derive(Debug, Error)]
pub enum AliasError {
    #[error("alias '{alias}' maps to itself")]
    SelfMapping { alias: String },

    #[error("invalid alias table JSON: {0}")]
    Json(#[from] serde_json::Error),
}
