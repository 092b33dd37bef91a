use serde::{Deserialize, Serialize};

/// Scores above this are shown as a full bar.
pub const DISPLAY_SCORE_CAP: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    ExtremeLtv,
    HighLtv,
    ModerateLtv,
    VeryPoorCredit,
    PoorCredit,
    FairCredit,
    PoorDocumentQuality,
    ModerateDocumentQuality,
    SignificantValuationIssue,
    MinorValuationConcern,
    MultiplePreviousMortgages,
}

impl RiskFactor {
    pub fn points(self) -> u32 {
        match self {
            RiskFactor::ExtremeLtv => 30,
            RiskFactor::HighLtv => 20,
            RiskFactor::ModerateLtv => 10,
            RiskFactor::VeryPoorCredit => 25,
            RiskFactor::PoorCredit => 15,
            RiskFactor::FairCredit => 5,
            RiskFactor::PoorDocumentQuality => 20,
            RiskFactor::ModerateDocumentQuality => 10,
            RiskFactor::SignificantValuationIssue => 15,
            RiskFactor::MinorValuationConcern => 8,
            RiskFactor::MultiplePreviousMortgages => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::ExtremeLtv => "Extremely High LTV",
            RiskFactor::HighLtv => "High LTV",
            RiskFactor::ModerateLtv => "Moderate LTV",
            RiskFactor::VeryPoorCredit => "Very Poor Credit",
            RiskFactor::PoorCredit => "Poor Credit",
            RiskFactor::FairCredit => "Fair Credit",
            RiskFactor::PoorDocumentQuality => "Poor Document Quality",
            RiskFactor::ModerateDocumentQuality => "Moderate Document Quality",
            RiskFactor::SignificantValuationIssue => "Significant Valuation Issue",
            RiskFactor::MinorValuationConcern => "Minor Valuation Concern",
            RiskFactor::MultiplePreviousMortgages => "Multiple Previous Mortgages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Excellent,
    Low,
    Moderate,
    High,
}

impl RiskProfile {
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => RiskProfile::Excellent,
            1..=20 => RiskProfile::Low,
            21..=50 => RiskProfile::Moderate,
            _ => RiskProfile::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Uncapped sum of the triggered factor points.
    pub score: u32,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    pub fn display_score(&self) -> u32 {
        self.score.min(DISPLAY_SCORE_CAP)
    }

    pub fn profile(&self) -> RiskProfile {
        RiskProfile::from_score(self.score)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.factors.iter().map(|factor| factor.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Prevents the application from reaching the classifier.
    Blocking,
    /// Shown as a warning only.
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    LoanAmountNotPositive,
    LoanAmountUnusuallyHigh,
    TenureBelowMinimum,
    TenureExceeded,
    LtvNegative,
    LtvExceeded,
    ValuationDifferenceExtreme,
    OwnershipScoreOutOfRange,
    OcrConfidenceOutOfRange,
    CreditScoreBelowMinimum,
    CreditScoreExceeded,
    IncomeNegative,
    IncomeUnusuallyHigh,
    NonFiniteValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: ValidationRule,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}
