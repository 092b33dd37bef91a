pub mod tree_shap;

use crate::classifier::TrainedModel;
use serde::{Deserialize, Serialize};

/// Per-feature SHAP attribution for one scaled sample. Forests are
/// explained in probability units, logistic models in log-odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub base_value: f64,
    pub values: Vec<f64>,
}

pub fn explain(model: &TrainedModel, scaled: &[f64]) -> Explanation {
    match model {
        TrainedModel::RandomForest(forest) => {
            let (base_value, values) = tree_shap::forest_shap(forest, scaled);
            Explanation { base_value, values }
        }
        // Scaled inputs are centred on the training mean, so each term's
        // background expectation is zero.
        TrainedModel::LogisticRegression(model) => Explanation {
            base_value: model.intercept,
            values: model
                .coefficients
                .iter()
                .zip(scaled)
                .map(|(w, x)| w * x)
                .collect(),
        },
    }
}

/// SHAP values for every row, row-major.
pub fn explain_rows(model: &TrainedModel, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter().map(|row| explain(model, row).values).collect()
}
