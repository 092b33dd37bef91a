#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const DATASET_HEADER: &str = "loan_amount,loan_tenure_months,ltv,valuation_diff_pct,num_prev_mortgages,ownership_match_score,ocr_confidence,encumbrance_flag,credit_score,income,isFraud";

/// Splits on LTV at 80, then on credit score at 650 for the high-LTV branch.
pub fn ltv_credit_forest() -> Value {
    json!({
        "kind": "random_forest",
        "feature_names": [
            "loan_amount", "loan_tenure_months", "ltv", "valuation_diff_pct",
            "num_prev_mortgages", "ownership_match_score", "ocr_confidence",
            "encumbrance_flag", "credit_score", "income"
        ],
        "trees": [
            {
                "children_left": [1, -1, 3, -1, -1],
                "children_right": [2, -1, 4, -1, -1],
                "feature": [2, -2, 8, -2, -2],
                "threshold": [80.0, -2.0, 650.0, -2.0, -2.0],
                "value": [[60.0, 40.0], [45.0, 5.0], [15.0, 35.0], [2.0, 28.0], [13.0, 7.0]],
                "impurity": [0.48, 0.18, 0.42, 0.124, 0.455],
                "n_node_samples": [100, 50, 50, 30, 20]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [6, -2, -2],
                "threshold": [0.7, -2.0, -2.0],
                "value": [[0.5, 0.5], [0.2, 0.8], [0.8, 0.2]],
                "impurity": [0.5, 0.32, 0.32],
                "n_node_samples": [80, 40, 40]
            }
        ]
    })
}

pub fn logistic_model() -> Value {
    json!({
        "kind": "logistic_regression",
        "coefficients": [0.0, 0.0, 0.08, -0.02, 0.3, -2.0, -3.0, 0.5, -0.01, 0.0],
        "intercept": 0.5
    })
}

pub fn identity_scaler() -> Value {
    json!({ "mean": vec![0.0; 10], "scale": vec![1.0; 10] })
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).expect("serialize")).expect("write json");
}

/// Writes classifier and scaler files into `dir` and returns their paths.
pub fn write_artifacts(dir: &Path, model: &Value) -> (PathBuf, PathBuf) {
    let model_path = dir.join("fraud_detection_model.json");
    let scaler_path = dir.join("scaler.json");
    write_json(&model_path, model);
    write_json(&scaler_path, &identity_scaler());
    (model_path, scaler_path)
}

/// Deterministic dataset where high LTV with weak credit is fraudulent.
pub fn write_dataset(path: &Path, rows: usize) {
    let mut csv = String::from(DATASET_HEADER);
    csv.push('\n');
    for i in 0..rows {
        let fraud = i % 4 == 0;
        let ltv = if fraud { 85.0 + (i % 13) as f64 } else { 45.0 + (i % 37) as f64 };
        let credit = if fraud { 540 + (i % 90) } else { 640 + (i % 190) };
        let ocr = if fraud { 0.4 + (i % 5) as f64 * 0.05 } else { 0.75 + (i % 5) as f64 * 0.05 };
        csv.push_str(&format!(
            "{},{},{:.1},{:.1},{},{:.2},{:.2},{},{},{},{}\n",
            150_000 + (i % 17) * 25_000,
            120 + (i % 4) * 60,
            ltv,
            if fraud { -12.0 - (i % 6) as f64 } else { (i % 9) as f64 - 4.0 },
            if fraud { 3 + i % 3 } else { i % 3 },
            if fraud { 0.6 } else { 0.93 },
            ocr,
            u8::from(fraud && i % 3 == 0),
            credit,
            40_000 + (i % 11) * 7_500,
            u8::from(fraud),
        ));
    }
    fs::write(path, csv).expect("write dataset");
}
