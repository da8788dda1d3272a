//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{BUILTIN_LOCALES, DEFAULT_DISTRICT_COLUMN};
use crate::report::DEFAULT_EXPORT_NAME;

/// Aedes - Classify dengue outbreak risk per district and recommend interventions
#[derive(Parser, Debug)]
#[command(name = "aedes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// CSV export path.
    /// Defaults to input directory with '_risk' suffix (e.g., data.csv -> data_risk.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model artifact (JSON bundle of scaler, classifier and labels).
    /// Defaults to the built-in demonstration model.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Language of the built-in recommendations ("en" or "id")
    #[arg(long, default_value = "en", value_parser = validate_locale)]
    pub locale: String,

    /// Custom recommendation knowledge base (JSON). Overrides --locale.
    #[arg(long)]
    pub recommendations: Option<PathBuf>,

    /// Custom district coordinate registry (JSON).
    /// Defaults to the built-in Kota Bandung registry.
    #[arg(long)]
    pub coordinates: Option<PathBuf>,

    /// Custom column alias table (JSON object of alias -> canonical name).
    /// Defaults to the built-in Indonesian header aliases.
    #[arg(long, global = true)]
    pub aliases: Option<PathBuf>,

    /// Name of the district identifier column
    #[arg(long, default_value = DEFAULT_DISTRICT_COLUMN, global = true)]
    pub district_column: String,

    /// Number successful records 1..N instead of keeping input row positions
    #[arg(long, default_value = "false")]
    pub renumber: bool,

    /// Add latitude, longitude and coordinate_resolved columns to the CSV export
    #[arg(long, default_value = "false")]
    pub include_coordinates: bool,

    /// Also write a JSON report next to the CSV export
    #[arg(long, default_value = "false")]
    pub report_json: bool,

    /// Also write a GeoJSON map layer next to the CSV export
    #[arg(long, default_value = "false")]
    pub geojson: bool,

    /// Package all exported files into a single zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Show the per-district detail panel with recommended actions
    #[arg(long, default_value = "false")]
    pub details: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the required input columns and accepted aliases
    Columns,

    /// Check an input file against the required columns without classifying
    Validate {
        /// Input file path (CSV or Parquet)
        input: PathBuf,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the CSV export path, deriving from input if not explicitly provided.
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let input = self.input.as_ref()?;
        if input.file_stem().is_none() {
            return Some(PathBuf::from(DEFAULT_EXPORT_NAME));
        }
        self.derived_path("risk", "csv")
    }

    /// JSON report path, next to the CSV export
    pub fn report_json_path(&self) -> Option<PathBuf> {
        self.sibling_of_output("risk_report", "json")
    }

    /// GeoJSON map layer path, next to the CSV export
    pub fn geojson_path(&self) -> Option<PathBuf> {
        self.sibling_of_output("risk_map", "geojson")
    }

    /// Zip bundle path, next to the CSV export
    pub fn bundle_path(&self) -> Option<PathBuf> {
        self.sibling_of_output("risk_reports", "zip")
    }

    fn derived_path(&self, suffix: &str, extension: &str) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        let parent = input.parent().unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        Some(parent.join(format!("{}_{}.{}", stem, suffix, extension)))
    }

    fn sibling_of_output(&self, suffix: &str, extension: &str) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        let output = self.output_path()?;
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        Some(parent.join(format!("{}_{}.{}", stem, suffix, extension)))
    }
}

/// Validator for the locale parameter
fn validate_locale(s: &str) -> Result<String, String> {
    if BUILTIN_LOCALES.contains(&s) {
        Ok(s.to_string())
    } else {
        Err(format!(
            "locale must be one of {}, got '{}'",
            BUILTIN_LOCALES.join(", "),
            s
        ))
    }
}
