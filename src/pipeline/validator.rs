//! Schema validation and feature matrix assembly

use polars::prelude::*;

use super::error::SchemaError;
use super::schema::{FeatureSchema, Indicator, Indicators};

/// One input row after validation
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// 1-based position in the input table
    pub row: usize,
    /// `None` when the cell is empty
    pub district: Option<String>,
    pub indicators: Indicators,
}

/// Input table reduced to the schema's columns, in canonical order
#[derive(Debug, Clone, Default)]
pub struct ValidatedTable {
    pub records: Vec<InputRecord>,
}

impl ValidatedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature matrix, one canonical-order vector per row
    pub fn feature_matrix(&self) -> Vec<&[f64]> {
        self.records
            .iter()
            .map(|r| r.indicators.as_slice())
            .collect()
    }
}

/// Names of required columns absent from `df`, in schema order
pub fn find_missing_columns(df: &DataFrame, schema: &FeatureSchema) -> Vec<String> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    schema
        .required_columns()
        .into_iter()
        .filter(|col| !present.iter().any(|p| p == col))
        .map(|col| col.to_string())
        .collect()
}

/// Check `df` against the schema and extract the feature matrix.
///
/// Column matching is exact. Every missing column is reported, not just the
/// first. Extra columns are ignored. Empty or non-numeric indicator cells
/// become `NaN` and are left for the classifier to reject per row.
pub fn validate_schema(df: &DataFrame, schema: &FeatureSchema) -> Result<ValidatedTable, SchemaError> {
    let missing = find_missing_columns(df, schema);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { missing });
    }

    let height = df.height();
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(Indicator::ALL.len());

    for indicator in Indicator::ALL {
        let name = indicator.column();
        let values = read_numeric_column(df, name)?;
        columns.push(values);
    }

    let districts = read_district_column(df, schema.district_column())?;

    let records = (0..height)
        .map(|i| {
            let mut values = [f64::NAN; 9];
            for (slot, column) in values.iter_mut().zip(columns.iter()) {
                *slot = column[i];
            }
            InputRecord {
                row: i + 1,
                district: districts[i].clone(),
                indicators: Indicators(values),
            }
        })
        .collect();

    Ok(ValidatedTable { records })
}

fn incompatible(column: &str, expected: &'static str, err: PolarsError) -> SchemaError {
    SchemaError::IncompatibleColumn {
        column: column.to_string(),
        expected,
        reason: err.to_string(),
    }
}

fn read_numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, SchemaError> {
    let column = df
        .column(name)
        .map_err(|e| incompatible(name, "a number", e))?;
    if column.dtype() == &DataType::Boolean {
        return Err(SchemaError::IncompatibleColumn {
            column: name.to_string(),
            expected: "a number",
            reason: "boolean values are not numeric indicators".to_string(),
        });
    }

    // Non-strict cast: unparseable strings become null
    let cast = column
        .cast(&DataType::Float64)
        .map_err(|e| incompatible(name, "a number", e))?;
    let values = cast
        .f64()
        .map_err(|e| incompatible(name, "a number", e))?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    Ok(values)
}

fn read_district_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, SchemaError> {
    let column = df
        .column(name)
        .map_err(|e| incompatible(name, "text", e))?;
    let cast = column
        .cast(&DataType::String)
        .map_err(|e| incompatible(name, "text", e))?;
    let values = cast
        .str()
        .map_err(|e| incompatible(name, "text", e))?
        .into_iter()
        .map(|v| match v {
            Some(s) if !s.trim().is_empty() => Some(s.to_string()),
            _ => None,
        })
        .collect();

    Ok(values)
}
