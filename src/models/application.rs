use serde::{Deserialize, Serialize};

/// Number of features the classifier and scaler were fit on.
pub const FEATURE_COUNT: usize = 10;

/// Column names in the exact order the scaler and classifier were fit with.
/// Reordering these silently corrupts every prediction.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "loan_amount",
    "loan_tenure_months",
    "ltv",
    "valuation_diff_pct",
    "num_prev_mortgages",
    "ownership_match_score",
    "ocr_confidence",
    "encumbrance_flag",
    "credit_score",
    "income",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub loan_amount: f64,
    pub loan_tenure_months: u32,
    pub loan_to_value_ratio: f64,
    pub valuation_difference_pct: f64,
    pub num_prev_mortgages: u32,
    pub ownership_match_score: f64,
    pub ocr_confidence: f64,
    pub encumbrance_flag: bool,
    pub credit_score: u32,
    pub income: f64,
}

impl Default for LoanApplication {
    /// Initial values of the estimator form.
    fn default() -> Self {
        Self {
            loan_amount: 0.0,
            loan_tenure_months: 360,
            loan_to_value_ratio: 80.0,
            valuation_difference_pct: 0.0,
            num_prev_mortgages: 0,
            ownership_match_score: 0.8,
            ocr_confidence: 0.85,
            encumbrance_flag: false,
            credit_score: 700,
            income: 50_000.0,
        }
    }
}

impl LoanApplication {
    /// Classifier input vector, ordered as [`FEATURE_NAMES`].
    pub fn to_feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.loan_amount,
            f64::from(self.loan_tenure_months),
            self.loan_to_value_ratio,
            self.valuation_difference_pct,
            f64::from(self.num_prev_mortgages),
            self.ownership_match_score,
            self.ocr_confidence,
            if self.encumbrance_flag { 1.0 } else { 0.0 },
            f64::from(self.credit_score),
            self.income,
        ]
    }

    /// Value of a single feature by its column name.
    pub fn feature(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| self.to_feature_vector()[index])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePreset {
    Safe,
    Risky,
}

impl SamplePreset {
    pub fn application(self) -> LoanApplication {
        match self {
            SamplePreset::Safe => LoanApplication {
                loan_amount: 250_000.0,
                loan_tenure_months: 360,
                loan_to_value_ratio: 75.0,
                valuation_difference_pct: 2.5,
                num_prev_mortgages: 1,
                ownership_match_score: 0.95,
                ocr_confidence: 0.92,
                encumbrance_flag: false,
                credit_score: 780,
                income: 85_000.0,
            },
            SamplePreset::Risky => LoanApplication {
                loan_amount: 500_000.0,
                loan_tenure_months: 180,
                loan_to_value_ratio: 95.0,
                valuation_difference_pct: -15.0,
                num_prev_mortgages: 4,
                ownership_match_score: 0.65,
                ocr_confidence: 0.45,
                encumbrance_flag: true,
                credit_score: 580,
                income: 45_000.0,
            },
        }
    }
}
