use crate::models::application::LoanApplication;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LtvIndicator {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditIndicator {
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterColor {
    Green,
    Yellow,
    Amber,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMeter {
    /// 0–100.
    pub level: f64,
    pub color: MeterColor,
}

/// Per-factor levels shown under the verdict card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub ltv: RiskLevel,
    pub credit: RiskLevel,
    pub document: RiskLevel,
}

pub fn ltv_indicator(ltv: f64) -> LtvIndicator {
    if ltv > 90.0 {
        LtvIndicator::VeryHigh
    } else if ltv > 80.0 {
        LtvIndicator::High
    } else if ltv > 60.0 {
        LtvIndicator::Moderate
    } else {
        LtvIndicator::Low
    }
}

pub fn credit_indicator(credit_score: u32) -> CreditIndicator {
    match credit_score {
        750.. => CreditIndicator::Excellent,
        700..=749 => CreditIndicator::Good,
        650..=699 => CreditIndicator::Fair,
        _ => CreditIndicator::Poor,
    }
}

/// Continuous companion to the tiered heuristic score.
pub fn risk_meter(application: &LoanApplication) -> RiskMeter {
    let mut level = 0.0;
    if application.loan_to_value_ratio > 0.0 {
        level += (application.loan_to_value_ratio * 0.8).min(60.0);
    }
    level += ((750.0 - f64::from(application.credit_score)) * 0.15).max(0.0);
    level += (1.0 - application.ocr_confidence) * 30.0;
    let level = level.min(100.0);

    let color = if level > 75.0 {
        MeterColor::Red
    } else if level > 50.0 {
        MeterColor::Amber
    } else if level > 25.0 {
        MeterColor::Yellow
    } else {
        MeterColor::Green
    };

    RiskMeter { level, color }
}

pub fn risk_breakdown(application: &LoanApplication) -> RiskBreakdown {
    let ltv = if application.loan_to_value_ratio > 80.0 {
        RiskLevel::High
    } else if application.loan_to_value_ratio > 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let credit = if application.credit_score < 650 {
        RiskLevel::High
    } else if application.credit_score < 750 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let document = if application.ocr_confidence < 0.7 {
        RiskLevel::High
    } else if application.ocr_confidence < 0.9 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskBreakdown {
        ltv,
        credit,
        document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::SamplePreset;

    #[test]
    fn indicator_bands() {
        assert_eq!(ltv_indicator(95.0), LtvIndicator::VeryHigh);
        assert_eq!(ltv_indicator(90.0), LtvIndicator::High);
        assert_eq!(ltv_indicator(60.0), LtvIndicator::Low);
        assert_eq!(credit_indicator(750), CreditIndicator::Excellent);
        assert_eq!(credit_indicator(749), CreditIndicator::Good);
        assert_eq!(credit_indicator(650), CreditIndicator::Fair);
        assert_eq!(credit_indicator(300), CreditIndicator::Poor);
    }

    #[test]
    fn meter_for_safe_sample() {
        let meter = risk_meter(&SamplePreset::Safe.application());
        // 60 (ltv capped) + 0 (credit) + 0.08 * 30
        assert!((meter.level - 62.4).abs() < 1e-9);
        assert_eq!(meter.color, MeterColor::Amber);
    }

    #[test]
    fn meter_is_capped() {
        let meter = risk_meter(&SamplePreset::Risky.application());
        assert_eq!(meter.level, 100.0);
        assert_eq!(meter.color, MeterColor::Red);
    }

    #[test]
    fn breakdown_for_risky_sample() {
        let breakdown = risk_breakdown(&SamplePreset::Risky.application());
        assert_eq!(
            breakdown,
            RiskBreakdown {
                ltv: RiskLevel::High,
                credit: RiskLevel::High,
                document: RiskLevel::High,
            }
        );
    }
}
