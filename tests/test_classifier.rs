//! Tests for the model artifact adapter

use aedes::pipeline::*;
use serde_json::{json, Value};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn feature_names() -> Vec<&'static str> {
    FeatureSchema::default().feature_columns()
}

/// Minimal valid linear artifact: identity scaler, class picked by dengue cases
fn linear_artifact() -> Value {
    let mut low = vec![0.0; 9];
    let mut high = vec![0.0; 9];
    low[0] = -1.0;
    high[0] = 1.0;

    json!({
        "schema_version": FEATURE_SCHEMA_VERSION,
        "model_version": "test-linear",
        "feature_names": feature_names(),
        "scaler": { "mean": vec![0.0; 9], "scale": vec![1.0; 9] },
        "classifier": {
            "kind": "linear",
            "coefficients": [low, vec![0.0; 9], high],
            "intercepts": [0.0, 5.0, -10.0]
        },
        "labels": ["Low", "Moderate", "High"]
    })
}

/// Single-tree forest: dengue_cases <= 5 -> Low, <= 15 -> Moderate, else High
fn forest_artifact() -> Value {
    json!({
        "schema_version": FEATURE_SCHEMA_VERSION,
        "model_version": "test-forest",
        "feature_names": feature_names(),
        "scaler": { "mean": vec![0.0; 9], "scale": vec![1.0; 9] },
        "classifier": {
            "kind": "forest",
            "trees": [{
                "children_left":  [1, -1, 3, -1, -1],
                "children_right": [2, -1, 4, -1, -1],
                "feature":        [0, -2, 0, -2, -2],
                "threshold":      [5.0, -2.0, 15.0, -2.0, -2.0],
                "value": [[10.0, 10.0, 10.0], [8.0, 1.0, 0.0], [2.0, 9.0, 10.0], [1.0, 9.0, 1.0], [0.0, 1.0, 9.0]]
            }]
        },
        "labels": ["Rendah", "Sedang", "Tinggi"]
    })
}

fn parse(value: &Value) -> Result<ModelArtifact, ArtifactMismatchError> {
    ModelArtifact::from_json(&value.to_string())
}

fn with_cases(cases: f64) -> [f64; 9] {
    let mut row = MODERATE_ROW;
    row[0] = cases;
    row
}

#[test]
fn test_builtin_model_classifies_reference_rows() {
    let model = ModelArtifact::builtin().unwrap();

    assert_eq!(model.classify(&HIGH_ROW).unwrap(), RiskTier::High);
    assert_eq!(model.classify(&LOW_ROW).unwrap(), RiskTier::Low);
    assert_eq!(model.classify(&MODERATE_ROW).unwrap(), RiskTier::Moderate);
    assert_eq!(model.model_version(), "logreg-2024.06-demo");
    assert_eq!(model.schema_version(), FEATURE_SCHEMA_VERSION);
}

#[test]
fn test_classification_is_deterministic() {
    let model = ModelArtifact::builtin().unwrap();
    let first = model.classify(&HIGH_ROW).unwrap();
    for _ in 0..10 {
        assert_eq!(model.classify(&HIGH_ROW).unwrap(), first);
    }
}

#[test]
fn test_linear_decision_path() {
    let model = parse(&linear_artifact()).unwrap();

    assert_eq!(model.classify(&with_cases(-8.0)).unwrap(), RiskTier::Low);
    assert_eq!(model.classify(&with_cases(2.0)).unwrap(), RiskTier::Moderate);
    assert_eq!(model.classify(&with_cases(20.0)).unwrap(), RiskTier::High);
}

#[test]
fn test_forest_decision_path() {
    let model = parse(&forest_artifact()).unwrap();

    assert_eq!(model.classify(&with_cases(1.0)).unwrap(), RiskTier::Low);
    assert_eq!(model.classify(&with_cases(5.0)).unwrap(), RiskTier::Low);
    assert_eq!(model.classify(&with_cases(10.0)).unwrap(), RiskTier::Moderate);
    assert_eq!(model.classify(&with_cases(30.0)).unwrap(), RiskTier::High);
}

#[test]
fn test_forest_averages_trees() {
    let mut artifact = forest_artifact();
    // Second tree is a single leaf leaning High: (0.2, 0, 0.8)
    artifact["classifier"]["trees"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "children_left": [-1],
            "children_right": [-1],
            "feature": [-2],
            "threshold": [-2.0],
            "value": [[1.0, 0.0, 4.0]]
        }));
    let model = parse(&artifact).unwrap();

    // Moderate leaf (1/11, 9/11, 1/11) + (0.2, 0, 0.8) -> High wins the mean
    assert_eq!(model.classify(&with_cases(10.0)).unwrap(), RiskTier::High);
    // Low leaf (8/9, 1/9, 0) + (0.2, 0, 0.8) -> Low still wins
    assert_eq!(model.classify(&with_cases(1.0)).unwrap(), RiskTier::Low);
}

#[test]
fn test_wrong_arity_is_rejected() {
    let model = ModelArtifact::builtin().unwrap();
    let err = model.classify(&HIGH_ROW[..8]).unwrap_err();
    assert_eq!(
        err,
        InferenceError::ArityMismatch {
            expected: 9,
            actual: 8
        }
    );
}

#[test]
fn test_non_finite_value_is_rejected() {
    let model = ModelArtifact::builtin().unwrap();
    let mut row = HIGH_ROW;
    row[6] = f64::NAN;

    let err = model.classify(&row).unwrap_err();
    assert_eq!(
        err,
        InferenceError::NonFinite {
            feature: "humidity".to_string()
        }
    );
}

#[test]
fn test_schema_version_mismatch() {
    let mut artifact = linear_artifact();
    artifact["schema_version"] = json!("dengue-features/0");
    let model = parse(&artifact).unwrap();

    let err = model.check_schema(&FeatureSchema::default()).unwrap_err();
    assert!(matches!(err, ArtifactMismatchError::SchemaVersion { .. }));
}

#[test]
fn test_feature_arity_mismatch() {
    let mut artifact = linear_artifact();
    let names = artifact["feature_names"].as_array_mut().unwrap();
    names.push(json!("population_density"));
    artifact["scaler"]["mean"].as_array_mut().unwrap().push(json!(0.0));
    artifact["scaler"]["scale"].as_array_mut().unwrap().push(json!(1.0));
    for row in artifact["classifier"]["coefficients"].as_array_mut().unwrap() {
        row.as_array_mut().unwrap().push(json!(0.0));
    }
    let model = parse(&artifact).unwrap();

    let err = model.check_schema(&FeatureSchema::default()).unwrap_err();
    assert_eq!(
        err,
        ArtifactMismatchError::FeatureArity {
            expected: 9,
            found: 10
        }
    );
}

#[test]
fn test_feature_order_mismatch() {
    let mut artifact = linear_artifact();
    let names = artifact["feature_names"].as_array_mut().unwrap();
    names.swap(2, 3);
    let model = parse(&artifact).unwrap();

    let err = model.check_schema(&FeatureSchema::default()).unwrap_err();
    assert_eq!(
        err,
        ArtifactMismatchError::FeatureOrder {
            position: 3,
            expected: "illegal_dump_sites".to_string(),
            found: "avg_temperature".to_string()
        }
    );
}

#[test]
fn test_scaler_shape_mismatch() {
    let mut artifact = linear_artifact();
    artifact["scaler"]["scale"] = json!([1.0, 1.0]);

    let err = parse(&artifact).unwrap_err();
    assert!(matches!(
        err,
        ArtifactMismatchError::ScalerShape { field: "scale", .. }
    ));
}

#[test]
fn test_class_count_mismatch() {
    let mut artifact = linear_artifact();
    artifact["labels"] = json!(["Low", "High"]);

    let err = parse(&artifact).unwrap_err();
    assert_eq!(
        err,
        ArtifactMismatchError::ClassCount {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn test_artifact_without_classes_is_rejected() {
    let mut artifact = linear_artifact();
    artifact["labels"] = json!([]);
    artifact["classifier"]["coefficients"] = json!([]);
    artifact["classifier"]["intercepts"] = json!([]);
    assert_eq!(parse(&artifact).unwrap_err(), ArtifactMismatchError::NoClasses);

    let mut artifact = forest_artifact();
    artifact["labels"] = json!([]);
    artifact["classifier"]["trees"] = json!([]);
    assert_eq!(parse(&artifact).unwrap_err(), ArtifactMismatchError::NoClasses);
}

#[test]
fn test_empty_forest_with_labels_is_rejected() {
    let mut artifact = forest_artifact();
    artifact["classifier"]["trees"] = json!([]);

    let err = parse(&artifact).unwrap_err();
    assert_eq!(
        err,
        ArtifactMismatchError::ClassCount {
            expected: 3,
            found: 0
        }
    );
}

#[test]
fn test_coefficient_shape_mismatch() {
    let mut artifact = linear_artifact();
    artifact["classifier"]["coefficients"][1] = json!([0.0, 0.0]);

    let err = parse(&artifact).unwrap_err();
    assert!(matches!(
        err,
        ArtifactMismatchError::CoefficientShape { row: 1, .. }
    ));
}

#[test]
fn test_unknown_label() {
    let mut artifact = linear_artifact();
    artifact["labels"] = json!(["Low", "Medium", "High"]);

    let err = parse(&artifact).unwrap_err();
    assert_eq!(err, ArtifactMismatchError::UnknownLabel("Medium".to_string()));
}

#[test]
fn test_invalid_tree_child_index() {
    let mut artifact = forest_artifact();
    artifact["classifier"]["trees"][0]["children_left"][2] = json!(0);

    let err = parse(&artifact).unwrap_err();
    assert!(matches!(err, ArtifactMismatchError::InvalidTree { tree: 0, .. }));
}

#[test]
fn test_unreadable_artifact() {
    let err = ModelArtifact::from_json("{not json").unwrap_err();
    assert!(matches!(err, ArtifactMismatchError::Unreadable(_)));
}

#[test]
fn test_load_from_file() {
    let (_dir, path) = create_temp_file("model.json", &forest_artifact().to_string());
    let model = ModelArtifact::load(&path).unwrap();
    assert_eq!(model.model_version(), "test-forest");
}

#[test]
fn test_context_refuses_mismatched_classifier() {
    let result = PipelineContext::new(
        FeatureSchema::default(),
        ColumnAliases::builtin().unwrap(),
        Box::new(FakeClassifier::reordered()),
        RecommendationBook::builtin("en").unwrap().unwrap(),
        GeoRegistry::builtin().unwrap(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ArtifactMismatchError::FeatureOrder { position: 1, .. }
    ));
}

#[test]
fn test_every_tier_label_decodes() {
    for tier in RiskTier::ALL {
        assert_eq!(RiskTier::from_label(&tier.to_string()), Some(tier));
    }
    assert_eq!(RiskTier::from_label("Tinggi"), Some(RiskTier::High));
    assert_eq!(RiskTier::from_label("Sedang"), Some(RiskTier::Moderate));
    assert_eq!(RiskTier::from_label("Rendah"), Some(RiskTier::Low));
    assert_eq!(RiskTier::from_label("Severe"), None);
}
