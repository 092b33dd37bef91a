use crate::models::application::LoanApplication;
use crate::models::assessment::{Severity, ValidationRule, Violation};

pub const MAX_TENURE_MONTHS: u32 = 480;
pub const MAX_LTV: f64 = 100.0;
pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;
/// Amounts above this are flagged but still scored.
pub const PLAUSIBLE_AMOUNT_LIMIT: f64 = 10_000_000.0;
pub const PLAUSIBLE_VALUATION_DIFF: f64 = 50.0;

/// Checks every rule and returns all violations, in rule order.
/// An empty result means the application can be scored and classified.
pub fn validate_application(application: &LoanApplication) -> Vec<Violation> {
    let mut violations = Vec::new();

    let finite = [
        application.loan_amount,
        application.loan_to_value_ratio,
        application.valuation_difference_pct,
        application.ownership_match_score,
        application.ocr_confidence,
        application.income,
    ]
    .iter()
    .all(|value| value.is_finite());
    if !finite {
        violations.push(blocking(
            ValidationRule::NonFiniteValue,
            "All numeric fields must be finite numbers",
        ));
    }

    if application.loan_amount <= 0.0 {
        violations.push(blocking(
            ValidationRule::LoanAmountNotPositive,
            "Loan amount must be greater than 0",
        ));
    }
    if application.loan_amount > PLAUSIBLE_AMOUNT_LIMIT {
        violations.push(advisory(
            ValidationRule::LoanAmountUnusuallyHigh,
            "Loan amount seems unusually high (>$10M)",
        ));
    }

    if application.loan_tenure_months == 0 {
        violations.push(blocking(
            ValidationRule::TenureBelowMinimum,
            "Loan tenure must be at least 1 month",
        ));
    }
    if application.loan_tenure_months > MAX_TENURE_MONTHS {
        violations.push(blocking(
            ValidationRule::TenureExceeded,
            "Loan tenure exceeds maximum (40 years)",
        ));
    }

    if application.loan_to_value_ratio < 0.0 {
        violations.push(blocking(ValidationRule::LtvNegative, "LTV cannot be negative"));
    }
    if application.loan_to_value_ratio > MAX_LTV {
        violations.push(blocking(ValidationRule::LtvExceeded, "LTV cannot exceed 100%"));
    }

    if application.valuation_difference_pct.abs() > PLAUSIBLE_VALUATION_DIFF {
        violations.push(advisory(
            ValidationRule::ValuationDifferenceExtreme,
            "Valuation difference seems extreme (>50%)",
        ));
    }

    if !(0.0..=1.0).contains(&application.ownership_match_score) {
        violations.push(blocking(
            ValidationRule::OwnershipScoreOutOfRange,
            "Ownership match score must be between 0 and 1",
        ));
    }
    if !(0.0..=1.0).contains(&application.ocr_confidence) {
        violations.push(blocking(
            ValidationRule::OcrConfidenceOutOfRange,
            "OCR confidence must be between 0 and 1",
        ));
    }

    if application.credit_score < MIN_CREDIT_SCORE {
        violations.push(blocking(
            ValidationRule::CreditScoreBelowMinimum,
            "Credit score cannot be below 300",
        ));
    }
    if application.credit_score > MAX_CREDIT_SCORE {
        violations.push(blocking(
            ValidationRule::CreditScoreExceeded,
            "Credit score cannot exceed 850",
        ));
    }

    if application.income < 0.0 {
        violations.push(blocking(ValidationRule::IncomeNegative, "Income cannot be negative"));
    }
    if application.income > PLAUSIBLE_AMOUNT_LIMIT {
        violations.push(advisory(
            ValidationRule::IncomeUnusuallyHigh,
            "Income seems unusually high (>$10M)",
        ));
    }

    violations
}

pub fn has_blocking(violations: &[Violation]) -> bool {
    violations.iter().any(Violation::is_blocking)
}

fn blocking(rule: ValidationRule, message: &str) -> Violation {
    Violation {
        rule,
        severity: Severity::Blocking,
        message: message.to_string(),
    }
}

fn advisory(rule: ValidationRule, message: &str) -> Violation {
    Violation {
        rule,
        severity: Severity::Advisory,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::SamplePreset;

    #[test]
    fn reports_every_violated_rule() {
        let application = LoanApplication {
            loan_amount: 100.0,
            loan_tenure_months: 500,
            loan_to_value_ratio: 150.0,
            valuation_difference_pct: 0.0,
            credit_score: 900,
            income: 100.0,
            ..LoanApplication::default()
        };

        let violations = validate_application(&application);
        let rules: Vec<ValidationRule> = violations.iter().map(|v| v.rule).collect();

        assert_eq!(
            rules,
            vec![
                ValidationRule::TenureExceeded,
                ValidationRule::LtvExceeded,
                ValidationRule::CreditScoreExceeded,
            ]
        );
        assert!(has_blocking(&violations));
    }

    #[test]
    fn advisory_warnings_do_not_block() {
        let application = LoanApplication {
            loan_amount: 12_000_000.0,
            valuation_difference_pct: -60.0,
            income: 20_000_000.0,
            ..SamplePreset::Safe.application()
        };

        let violations = validate_application(&application);
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.severity == Severity::Advisory));
        assert!(!has_blocking(&violations));
    }

    #[test]
    fn zero_amount_and_out_of_range_scores_are_blocking() {
        let application = LoanApplication {
            ownership_match_score: 1.2,
            ocr_confidence: -0.1,
            credit_score: 250,
            ..LoanApplication::default()
        };

        let rules: Vec<ValidationRule> = validate_application(&application)
            .into_iter()
            .map(|v| v.rule)
            .collect();

        assert_eq!(
            rules,
            vec![
                ValidationRule::LoanAmountNotPositive,
                ValidationRule::OwnershipScoreOutOfRange,
                ValidationRule::OcrConfidenceOutOfRange,
                ValidationRule::CreditScoreBelowMinimum,
            ]
        );
    }

    #[test]
    fn presets_are_valid() {
        assert!(validate_application(&SamplePreset::Safe.application()).is_empty());
        assert!(validate_application(&SamplePreset::Risky.application()).is_empty());
    }

    #[test]
    fn nan_is_rejected() {
        let application = LoanApplication {
            loan_amount: 1000.0,
            income: f64::NAN,
            ..LoanApplication::default()
        };
        let violations = validate_application(&application);
        assert_eq!(violations[0].rule, ValidationRule::NonFiniteValue);
    }
}
