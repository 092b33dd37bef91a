use crate::models::application::LoanApplication;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiBand {
    LowRisk,
    Acceptable,
    HighRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtToIncome {
    /// Annual debt service over annual income, in percent.
    pub ratio_pct: f64,
    pub band: DtiBand,
}

/// Fixed-rate amortization. `None` when there is nothing to amortize.
pub fn amortize(principal: f64, tenure_months: u32, annual_rate: f64) -> Option<PaymentSchedule> {
    if principal <= 0.0 || tenure_months == 0 || !principal.is_finite() {
        return None;
    }

    let n = f64::from(tenure_months);
    let monthly_rate = annual_rate / 12.0;
    let monthly_payment = if monthly_rate > 0.0 {
        let growth = (1.0 + monthly_rate).powf(n);
        principal * monthly_rate * growth / (growth - 1.0)
    } else {
        principal / n
    };
    let total_payment = monthly_payment * n;

    Some(PaymentSchedule {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

/// Rough DTI: a year of interest-only service on the full amount over
/// annual income.
pub fn debt_to_income(application: &LoanApplication, annual_rate: f64) -> Option<DebtToIncome> {
    if application.income <= 0.0 || application.loan_amount <= 0.0 {
        return None;
    }

    let monthly_payment = application.loan_amount * annual_rate / 12.0;
    let ratio_pct = monthly_payment * 12.0 / application.income * 100.0;
    let band = if ratio_pct > 43.0 {
        DtiBand::HighRisk
    } else if ratio_pct > 28.0 {
        DtiBand::Acceptable
    } else {
        DtiBand::LowRisk
    };

    Some(DebtToIncome { ratio_pct, band })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_year_mortgage_payment() {
        let schedule = amortize(240_000.0, 360, DEFAULT_ANNUAL_INTEREST_RATE).unwrap();
        assert!((schedule.monthly_payment - 1288.37).abs() < 0.01);
        assert!((schedule.total_payment - schedule.monthly_payment * 360.0).abs() < 1e-6);
        assert!((schedule.total_interest - (schedule.total_payment - 240_000.0)).abs() < 1e-6);
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let schedule = amortize(12_000.0, 12, 0.0).unwrap();
        assert_eq!(schedule.monthly_payment, 1000.0);
        assert_eq!(schedule.total_interest, 0.0);
    }

    #[test]
    fn nothing_to_amortize() {
        assert!(amortize(0.0, 360, 0.05).is_none());
        assert!(amortize(1000.0, 0, 0.05).is_none());
    }

    #[test]
    fn dti_bands() {
        let application = LoanApplication {
            loan_amount: 250_000.0,
            income: 85_000.0,
            ..LoanApplication::default()
        };
        let dti = debt_to_income(&application, 0.05).unwrap();
        assert!((dti.ratio_pct - 14.705882).abs() < 1e-4);
        assert_eq!(dti.band, DtiBand::LowRisk);

        let stretched = LoanApplication {
            loan_amount: 500_000.0,
            income: 45_000.0,
            ..LoanApplication::default()
        };
        assert_eq!(debt_to_income(&stretched, 0.05).unwrap().band, DtiBand::HighRisk);

        let borderline = LoanApplication {
            loan_amount: 300_000.0,
            income: 50_000.0,
            ..LoanApplication::default()
        };
        assert_eq!(debt_to_income(&borderline, 0.05).unwrap().band, DtiBand::Acceptable);

        assert!(debt_to_income(&LoanApplication::default(), 0.05).is_none());
    }
}
