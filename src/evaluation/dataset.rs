use crate::errors::{FraudLensError, Result};
use crate::models::application::{LoanApplication, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DATASET_FILE: &str = "loan_land_fraud.csv";

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    loan_amount: f64,
    loan_tenure_months: f64,
    ltv: f64,
    valuation_diff_pct: f64,
    num_prev_mortgages: f64,
    ownership_match_score: f64,
    ocr_confidence: f64,
    encumbrance_flag: f64,
    credit_score: f64,
    income: f64,
    #[serde(rename = "isFraud")]
    is_fraud: f64,
}

impl DatasetRecord {
    fn into_labelled(self) -> std::result::Result<(LoanApplication, u8), String> {
        let whole = |name: &str, value: f64| -> std::result::Result<u32, String> {
            if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
                return Err(format!("{name} must be a non-negative whole number, got {value}"));
            }
            Ok(value.round() as u32)
        };

        let application = LoanApplication {
            loan_amount: self.loan_amount,
            loan_tenure_months: whole("loan_tenure_months", self.loan_tenure_months)?,
            loan_to_value_ratio: self.ltv,
            valuation_difference_pct: self.valuation_diff_pct,
            num_prev_mortgages: whole("num_prev_mortgages", self.num_prev_mortgages)?,
            ownership_match_score: self.ownership_match_score,
            ocr_confidence: self.ocr_confidence,
            encumbrance_flag: self.encumbrance_flag != 0.0,
            credit_score: whole("credit_score", self.credit_score)?,
            income: self.income,
        };
        let label = match self.is_fraud {
            v if v == 0.0 => 0,
            v if v == 1.0 => 1,
            other => return Err(format!("isFraud must be 0 or 1, got {other}")),
        };
        Ok((application, label))
    }
}

/// Labelled applications, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub applications: Vec<LoanApplication>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let dataset_error = |details: String| FraudLensError::Dataset {
            path: path.to_path_buf(),
            details,
        };

        let mut reader = csv::Reader::from_path(path).map_err(|e| dataset_error(e.to_string()))?;
        let mut dataset = Dataset::default();

        for (index, record) in reader.deserialize::<DatasetRecord>().enumerate() {
            let row = index + 2;
            let record = record.map_err(|e| dataset_error(format!("row {row}: {e}")))?;
            let (application, label) = record
                .into_labelled()
                .map_err(|e| dataset_error(format!("row {row}: {e}")))?;
            dataset.applications.push(application);
            dataset.labels.push(label);
        }

        if dataset.is_empty() {
            return Err(dataset_error("no rows".to_string()));
        }

        log::info!(
            "loaded {} rows ({} fraud) from {}",
            dataset.len(),
            dataset.fraud_count(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn fraud_count(&self) -> usize {
        self.labels.iter().filter(|label| **label == 1).count()
    }

    pub fn feature_rows(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.applications
            .iter()
            .map(LoanApplication::to_feature_vector)
            .collect()
    }

    /// One feature across all rows.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.applications
            .iter()
            .map(|application| application.to_feature_vector()[index])
            .collect()
    }

    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            applications: indices.iter().map(|&i| self.applications[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Per-class shuffled split keeping the class balance in both halves.
pub fn stratified_split(labels: &[u8], test_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = (indices.len() as f64 * test_fraction.clamp(0.0, 1.0)).round() as usize;
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Split { train, test }
}
