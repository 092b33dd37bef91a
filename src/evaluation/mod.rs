pub mod correlation;
pub mod dataset;
pub mod metrics;

use crate::classifier::TrainedArtifacts;
use crate::explain;
use crate::models::application::FEATURE_COUNT;
use dataset::{stratified_split, Dataset};
use metrics::{auc, roc_curve, ClassificationMetrics, ConfusionMatrix, RocCurve};

pub const TEST_FRACTION: f64 = 0.25;
pub const SPLIT_SEED: u64 = 42;

/// Everything the charts need from one pass over the held-out rows.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub full: Dataset,
    pub test: Dataset,
    pub scaled_test: Vec<Vec<f64>>,
    pub fraud_probabilities: Vec<f64>,
    pub predictions: Vec<u8>,
    pub confusion: ConfusionMatrix,
    pub metrics: ClassificationMetrics,
    pub roc: RocCurve,
    pub roc_auc: f64,
    pub importances: Vec<f64>,
    pub shap_values: Vec<Vec<f64>>,
    pub correlations: Vec<Vec<f64>>,
}

pub fn evaluate(
    dataset: &Dataset,
    artifacts: &TrainedArtifacts,
    test_fraction: f64,
    seed: u64,
) -> Evaluation {
    let split = stratified_split(&dataset.labels, test_fraction, seed);
    let test = dataset.subset(&split.test);
    log::info!(
        "evaluating on {} held-out rows ({} kept for training)",
        split.test.len(),
        split.train.len()
    );

    let scaled_test: Vec<Vec<f64>> = test
        .feature_rows()
        .iter()
        .map(|row| artifacts.scaler.transform(row).to_vec())
        .collect();

    let outcomes: Vec<_> = scaled_test
        .iter()
        .map(|row| artifacts.predict_scaled(row))
        .collect();
    let fraud_probabilities: Vec<f64> = outcomes.iter().map(|p| p.fraud_probability).collect();
    let predictions: Vec<u8> = outcomes.iter().map(|p| p.class.as_label()).collect();

    let confusion = ConfusionMatrix::from_labels(&test.labels, &predictions);
    let metrics = ClassificationMetrics::from_confusion(&confusion);
    let roc = roc_curve(&test.labels, &fraud_probabilities);
    let roc_auc = auc(&roc.fpr, &roc.tpr);
    log::info!(
        "accuracy {:.3}, precision {:.3}, recall {:.3}, f1 {:.3}, auc {:.3}",
        metrics.accuracy,
        metrics.precision,
        metrics.recall,
        metrics.f1,
        roc_auc
    );

    let shap_values = explain::explain_rows(&artifacts.model.model, &scaled_test);
    let columns: Vec<Vec<f64>> = (0..FEATURE_COUNT).map(|i| dataset.column(i)).collect();

    Evaluation {
        full: dataset.clone(),
        test,
        scaled_test,
        fraud_probabilities,
        predictions,
        confusion,
        metrics,
        roc,
        roc_auc,
        importances: artifacts.model.model.feature_importances(),
        shap_values,
        correlations: correlation::correlation_matrix(&columns),
    }
}
