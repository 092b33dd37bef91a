use crate::models::application::LoanApplication;
use crate::models::assessment::{RiskAssessment, RiskFactor};

/// Additive heuristic score shown next to the classifier output.
/// Factors are listed in table order: LTV, credit, OCR, valuation, mortgages.
pub fn assess_risk(application: &LoanApplication) -> RiskAssessment {
    let factors: Vec<RiskFactor> = [
        ltv_factor(application.loan_to_value_ratio),
        credit_factor(application.credit_score),
        document_factor(application.ocr_confidence),
        valuation_factor(application.valuation_difference_pct),
        mortgage_factor(application.num_prev_mortgages),
    ]
    .into_iter()
    .flatten()
    .collect();

    let score = factors.iter().map(|factor| factor.points()).sum();

    RiskAssessment { score, factors }
}

fn ltv_factor(ltv: f64) -> Option<RiskFactor> {
    if ltv > 90.0 {
        Some(RiskFactor::ExtremeLtv)
    } else if ltv > 80.0 {
        Some(RiskFactor::HighLtv)
    } else if ltv > 60.0 {
        Some(RiskFactor::ModerateLtv)
    } else {
        None
    }
}

fn credit_factor(credit_score: u32) -> Option<RiskFactor> {
    if credit_score < 600 {
        Some(RiskFactor::VeryPoorCredit)
    } else if credit_score < 650 {
        Some(RiskFactor::PoorCredit)
    } else if credit_score < 700 {
        Some(RiskFactor::FairCredit)
    } else {
        None
    }
}

fn document_factor(ocr_confidence: f64) -> Option<RiskFactor> {
    if ocr_confidence < 0.7 {
        Some(RiskFactor::PoorDocumentQuality)
    } else if ocr_confidence < 0.9 {
        Some(RiskFactor::ModerateDocumentQuality)
    } else {
        None
    }
}

fn valuation_factor(valuation_difference_pct: f64) -> Option<RiskFactor> {
    let magnitude = valuation_difference_pct.abs();
    if magnitude > 15.0 {
        Some(RiskFactor::SignificantValuationIssue)
    } else if magnitude > 5.0 {
        Some(RiskFactor::MinorValuationConcern)
    } else {
        None
    }
}

fn mortgage_factor(num_prev_mortgages: u32) -> Option<RiskFactor> {
    (num_prev_mortgages > 3).then_some(RiskFactor::MultiplePreviousMortgages)
}
