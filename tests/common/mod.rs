//! Shared test utilities and fixture generators

#![allow(dead_code)]

use aedes::pipeline::*;
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Indicators the built-in model classifies as High
pub const HIGH_ROW: [f64; 9] = [25.0, 300.0, 10.0, 29.0, 1.0, 20.0, 90.0, 12.0, 7.0];

/// Indicators the built-in model classifies as Low
pub const LOW_ROW: [f64; 9] = [1.0, 100.0, 0.0, 25.5, 5.0, 2.0, 72.0, 5.0, 11.0];

/// Scaler means; the built-in model classifies this as Moderate
pub const MODERATE_ROW: [f64; 9] = [8.0, 180.0, 4.0, 27.0, 3.0, 10.0, 80.0, 8.0, 9.0];

/// Build a DataFrame with the canonical columns from (district, indicators) rows
pub fn create_district_dataframe(rows: &[(&str, [f64; 9])]) -> DataFrame {
    let mut columns: Vec<Column> = Indicator::ALL
        .iter()
        .map(|indicator| {
            let values: Vec<f64> = rows.iter().map(|(_, v)| v[indicator.index()]).collect();
            Column::new(indicator.column().into(), values)
        })
        .collect();
    let districts: Vec<&str> = rows.iter().map(|(d, _)| *d).collect();
    columns.push(Column::new(DEFAULT_DISTRICT_COLUMN.into(), districts));

    DataFrame::new(columns).unwrap()
}

/// Three districts, one per tier: Sukajadi (High), Coblong (Low), Andir (Moderate)
pub fn create_sample_dataframe() -> DataFrame {
    create_district_dataframe(&[
        ("Sukajadi", HIGH_ROW),
        ("Coblong", LOW_ROW),
        ("Andir", MODERATE_ROW),
    ])
}

/// Same sample with the Indonesian headers of the original dashboard data
pub fn create_indonesian_dataframe() -> DataFrame {
    df! {
        "kecamatan" => ["Sukajadi", "Coblong"],
        "jumlah_kasus_dbd" => [HIGH_ROW[0], LOW_ROW[0]],
        "curah_hujan" => [HIGH_ROW[1], LOW_ROW[1]],
        "jumlah_tps_liar" => [HIGH_ROW[2], LOW_ROW[2]],
        "suhu_rata_rata" => [HIGH_ROW[3], LOW_ROW[3]],
        "jumlah_fogging" => [HIGH_ROW[4], LOW_ROW[4]],
        "jumlah_genangan_air" => [HIGH_ROW[5], LOW_ROW[5]],
        "kelembaban" => [HIGH_ROW[6], LOW_ROW[6]],
        "pengangguran" => [HIGH_ROW[7], LOW_ROW[7]],
        "tingkat_pendidikan" => [HIGH_ROW[8], LOW_ROW[8]],
    }
    .unwrap()
}

/// Create a larger random DataFrame for stress tests
pub fn create_large_district_dataframe(rows: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let data: Vec<(String, [f64; 9])> = (0..rows)
        .map(|i| {
            let mut values = [0.0; 9];
            for (v, mean) in values.iter_mut().zip(MODERATE_ROW) {
                *v = mean * rng.gen_range(0.5..1.5);
            }
            (format!("District {}", i), values)
        })
        .collect();
    let borrowed: Vec<(&str, [f64; 9])> = data.iter().map(|(d, v)| (d.as_str(), *v)).collect();

    create_district_dataframe(&borrowed)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Write raw text to a file inside a fresh temporary directory
pub fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Rule-based classifier keyed on dengue cases only:
/// >= 15 High, >= 5 Moderate, otherwise Low
pub struct FakeClassifier {
    names: Vec<String>,
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self {
            names: FeatureSchema::default()
                .feature_columns()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// A classifier whose feature list is in the wrong order
    pub fn reordered() -> Self {
        let mut fake = Self::new();
        fake.names.swap(0, 1);
        fake
    }
}

impl RiskClassifier for FakeClassifier {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn classify(&self, features: &[f64]) -> Result<RiskTier, InferenceError> {
        check_feature_vector(&self.names, features)?;
        let cases = features[Indicator::DengueCases.index()];
        Ok(if cases >= 15.0 {
            RiskTier::High
        } else if cases >= 5.0 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        })
    }

    fn model_version(&self) -> &str {
        "fake-rules"
    }
}

/// Context with every built-in collaborator and the given classifier
pub fn create_context(classifier: Box<dyn RiskClassifier>) -> PipelineContext {
    PipelineContext::new(
        FeatureSchema::default(),
        ColumnAliases::builtin().unwrap(),
        classifier,
        RecommendationBook::builtin("en").unwrap().unwrap(),
        GeoRegistry::builtin().unwrap(),
    )
    .unwrap()
}

/// Production context: built-in model artifact and data files
pub fn create_default_context() -> PipelineContext {
    create_context(Box::new(ModelArtifact::builtin().unwrap()))
}

/// Context backed by [`FakeClassifier`]
pub fn create_fake_context() -> PipelineContext {
    create_context(Box::new(FakeClassifier::new()))
}
