//! Classifier adapter: pretrained scaler + classifier + label decoder
//!
//! The pipeline only sees the [`RiskClassifier`] capability. The production
//! implementation, [`ModelArtifact`], is loaded once from a JSON bundle
//! exported from the training notebook and never mutated afterwards.
//!
//! Supported classifier kinds:
//! - `linear`: one coefficient row and intercept per class, argmax of the
//!   decision scores (logistic regression / linear SVM exports)
//! - `forest`: decision trees in the flat array layout, prediction is the
//!   argmax of the mean normalized leaf class distribution

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::{ArtifactMismatchError, InferenceError};
use super::risk::RiskTier;
use super::schema::FeatureSchema;

const DEFAULT_ARTIFACT: &str = include_str!("../../models/dengue_risk_v1.json");

/// Sentinel used for "no child" in the flat tree layout
const TREE_LEAF: i64 = -1;

/// Maps one canonical-order feature vector to a risk tier.
///
/// Implementations must be deterministic and must reject (not coerce) a
/// vector of the wrong length or containing non-finite values.
pub trait RiskClassifier: Send + Sync {
    /// Feature names in the order the classifier expects them
    fn feature_names(&self) -> &[String];

    fn classify(&self, features: &[f64]) -> std::result::Result<RiskTier, InferenceError>;

    /// Identifier reported in exports
    fn model_version(&self) -> &str {
        "unversioned"
    }

    /// Verify the classifier consumes exactly the schema's features, in order
    fn check_schema(&self, schema: &FeatureSchema) -> std::result::Result<(), ArtifactMismatchError> {
        check_feature_order(self.feature_names(), schema)
    }
}

/// Compare a classifier's feature list against the schema's canonical order
pub fn check_feature_order(
    names: &[String],
    schema: &FeatureSchema,
) -> std::result::Result<(), ArtifactMismatchError> {
    let expected = schema.feature_columns();
    if names.len() != expected.len() {
        return Err(ArtifactMismatchError::FeatureArity {
            expected: expected.len(),
            found: names.len(),
        });
    }

    for (position, (found, expected)) in names.iter().zip(expected).enumerate() {
        if found != expected {
            return Err(ArtifactMismatchError::FeatureOrder {
                position: position + 1,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }

    Ok(())
}

/// Reject vectors of the wrong arity or with missing/non-numeric values
pub fn check_feature_vector(
    names: &[String],
    features: &[f64],
) -> std::result::Result<(), InferenceError> {
    if features.len() != names.len() {
        return Err(InferenceError::ArityMismatch {
            expected: names.len(),
            actual: features.len(),
        });
    }

    if let Some((name, _)) = names.iter().zip(features).find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFinite {
            feature: name.clone(),
        });
    }

    Ok(())
}

/// Standardization parameters (`z = (x - mean) / scale`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant features are exported with a zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect()
    }
}

/// One decision tree in the flat array layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts (or weights)
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, arity: usize, n_classes: usize) -> std::result::Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays have different lengths".to_string());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF && right == TREE_LEAF {
                if self.value[node].len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class value(s), expected {}",
                        node,
                        self.value[node].len(),
                        n_classes
                    ));
                }
                continue;
            }

            // Children must come after their parent so traversal terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child index {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= arity as i64 {
                return Err(format!(
                    "node {} splits on feature {} (arity {})",
                    node, feature, arity
                ));
            }
        }

        Ok(())
    }

    /// Class distribution of the leaf reached by `z`, normalized to sum 1
    fn leaf_distribution(&self, z: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if z[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let counts = &self.value[node];
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / counts.len() as f64; counts.len()]
        }
    }
}

/// Classifier parameters, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierParams {
    Linear {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    Forest {
        trees: Vec<DecisionTree>,
    },
}

impl ClassifierParams {
    fn class_count(&self) -> Option<usize> {
        match self {
            ClassifierParams::Linear { intercepts, .. } => Some(intercepts.len()),
            ClassifierParams::Forest { trees } => trees.first().map(|t| {
                t.value.first().map(|v| v.len()).unwrap_or(0)
            }),
        }
    }

    /// Index of the predicted class. Ties go to the lowest index.
    fn predict_class(&self, z: &[f64]) -> usize {
        let scores: Vec<f64> = match self {
            ClassifierParams::Linear {
                coefficients,
                intercepts,
            } => coefficients
                .iter()
                .zip(intercepts)
                .map(|(row, b)| row.iter().zip(z).map(|(w, x)| w * x).sum::<f64>() + b)
                .collect(),
            ClassifierParams::Forest { trees } => {
                let mut mean = vec![0.0; self.class_count().unwrap_or(0)];
                for tree in trees {
                    for (acc, p) in mean.iter_mut().zip(tree.leaf_distribution(z)) {
                        *acc += p;
                    }
                }
                mean
            }
        };

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        best
    }
}

/// On-disk artifact bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArtifactFile {
    schema_version: String,
    model_version: String,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    classifier: ClassifierParams,
    labels: Vec<String>,
}

/// Pretrained scaler + classifier + label decoder
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    schema_version: String,
    model_version: String,
    feature_names: Vec<String>,
    scaler: StandardScaler,
    classifier: ClassifierParams,
    decoder: Vec<RiskTier>,
}

impl ModelArtifact {
    /// The demonstration artifact shipped with the crate
    pub fn builtin() -> std::result::Result<Self, ArtifactMismatchError> {
        Self::from_json(DEFAULT_ARTIFACT)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact: {}", path.display()))?;
        let artifact = Self::from_json(&json)
            .with_context(|| format!("Invalid model artifact: {}", path.display()))?;
        log::info!(
            "Loaded model artifact '{}' from {}",
            artifact.model_version,
            path.display()
        );
        Ok(artifact)
    }

    /// Parse and check the bundle for internal consistency
    pub fn from_json(json: &str) -> std::result::Result<Self, ArtifactMismatchError> {
        let file: ArtifactFile = serde_json::from_str(json)
            .map_err(|e| ArtifactMismatchError::Unreadable(e.to_string()))?;
        let arity = file.feature_names.len();

        for (field, values) in [("mean", &file.scaler.mean), ("scale", &file.scaler.scale)] {
            if values.len() != arity {
                return Err(ArtifactMismatchError::ScalerShape {
                    field,
                    expected: arity,
                    found: values.len(),
                });
            }
        }

        let decoder = file
            .labels
            .iter()
            .map(|label| {
                RiskTier::from_label(label)
                    .ok_or_else(|| ArtifactMismatchError::UnknownLabel(label.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if decoder.is_empty() {
            return Err(ArtifactMismatchError::NoClasses);
        }

        let n_classes = file.classifier.class_count().unwrap_or(0);
        if n_classes != decoder.len() {
            return Err(ArtifactMismatchError::ClassCount {
                expected: decoder.len(),
                found: n_classes,
            });
        }

        match &file.classifier {
            ClassifierParams::Linear { coefficients, .. } => {
                if coefficients.len() != n_classes {
                    return Err(ArtifactMismatchError::ClassCount {
                        expected: n_classes,
                        found: coefficients.len(),
                    });
                }
                for (row, coef) in coefficients.iter().enumerate() {
                    if coef.len() != arity {
                        return Err(ArtifactMismatchError::CoefficientShape {
                            row,
                            expected: arity,
                            found: coef.len(),
                        });
                    }
                }
            }
            ClassifierParams::Forest { trees } => {
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(arity, n_classes)
                        .map_err(|message| ArtifactMismatchError::InvalidTree { tree: i, message })?;
                }
            }
        }

        Ok(Self {
            schema_version: file.schema_version,
            model_version: file.model_version,
            feature_names: file.feature_names,
            scaler: file.scaler,
            classifier: file.classifier,
            decoder,
        })
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }
}

impl RiskClassifier for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classify(&self, features: &[f64]) -> std::result::Result<RiskTier, InferenceError> {
        check_feature_vector(&self.feature_names, features)?;
        let z = self.scaler.transform(features);
        let class = self.classifier.predict_class(&z);
        self.decoder
            .get(class)
            .copied()
            .ok_or(InferenceError::UndecodableClass {
                class,
                classes: self.decoder.len(),
            })
    }

    fn model_version(&self) -> &str {
        &self.model_version
    }

    fn check_schema(&self, schema: &FeatureSchema) -> std::result::Result<(), ArtifactMismatchError> {
        if self.schema_version != schema.version() {
            return Err(ArtifactMismatchError::SchemaVersion {
                expected: schema.version().to_string(),
                found: self.schema_version.clone(),
            });
        }
        check_feature_order(&self.feature_names, schema)
    }
}
