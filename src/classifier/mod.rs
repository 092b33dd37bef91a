pub mod forest;
pub mod logistic;
pub mod scaler;

use crate::errors::{FraudLensError, Result};
use crate::models::application::{LoanApplication, FEATURE_COUNT, FEATURE_NAMES};
use crate::models::prediction::{FraudClass, Prediction};
use forest::RandomForest;
use logistic::LogisticRegression;
use scaler::StandardScaler;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL_FILE: &str = "fraud_detection_model.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainedModel {
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

impl TrainedModel {
    pub fn algorithm(&self) -> &'static str {
        match self {
            TrainedModel::RandomForest(_) => "Random Forest",
            TrainedModel::LogisticRegression(_) => "Logistic Regression",
        }
    }

    pub fn predict_fraud_proba(&self, scaled: &[f64]) -> f64 {
        match self {
            TrainedModel::RandomForest(forest) => forest.predict_fraud_proba(scaled),
            TrainedModel::LogisticRegression(model) => model.predict_fraud_proba(scaled),
        }
    }

    pub fn feature_importances(&self) -> Vec<f64> {
        match self {
            TrainedModel::RandomForest(forest) => forest.feature_importances(FEATURE_COUNT),
            TrainedModel::LogisticRegression(model) => model.feature_importances(),
        }
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        match self {
            TrainedModel::RandomForest(forest) => forest.check_shape(FEATURE_COUNT),
            TrainedModel::LogisticRegression(model) => model.check_shape(FEATURE_COUNT),
        }
    }
}

/// Classifier file contents: the fitted model plus the column names it was
/// fit on, when the exporter recorded them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub model: TrainedModel,
}

impl ModelArtifact {
    fn check_shape(&self) -> std::result::Result<(), String> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "model was fit on columns {names:?}, expected {FEATURE_NAMES:?}"
                ));
            }
        }
        self.model.check_shape()
    }
}

/// Classifier and scaler, loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    pub model: ModelArtifact,
    pub scaler: StandardScaler,
}

impl TrainedArtifacts {
    pub fn new(model: ModelArtifact, scaler: StandardScaler) -> std::result::Result<Self, String> {
        model.check_shape()?;
        scaler.check_shape()?;
        Ok(Self { model, scaler })
    }

    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self> {
        let model: ModelArtifact = read_artifact(model_path)?;
        model.check_shape().map_err(|details| FraudLensError::ArtifactShape {
            path: model_path.to_path_buf(),
            details,
        })?;

        let scaler: StandardScaler = read_artifact(scaler_path)?;
        scaler.check_shape().map_err(|details| FraudLensError::ArtifactShape {
            path: scaler_path.to_path_buf(),
            details,
        })?;

        log::info!(
            "loaded {} classifier from {} and scaler from {}",
            model.model.algorithm(),
            model_path.display(),
            scaler_path.display()
        );

        Ok(Self { model, scaler })
    }

    pub fn scale(&self, application: &LoanApplication) -> [f64; FEATURE_COUNT] {
        self.scaler.transform(&application.to_feature_vector())
    }

    /// Classifies an already scaled feature row. Ties go to legitimate.
    pub fn predict_scaled(&self, scaled: &[f64]) -> Prediction {
        let fraud_probability = self.model.model.predict_fraud_proba(scaled).clamp(0.0, 1.0);
        let class = if fraud_probability > 0.5 {
            FraudClass::Fraud
        } else {
            FraudClass::Legitimate
        };
        Prediction {
            class,
            fraud_probability,
        }
    }

    pub fn predict(&self, application: &LoanApplication) -> Prediction {
        self.predict_scaled(&self.scale(application))
    }

    pub fn algorithm(&self) -> &'static str {
        self.model.model.algorithm()
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| FraudLensError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| FraudLensError::ArtifactParse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}
