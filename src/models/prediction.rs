use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudClass {
    Legitimate,
    Fraud,
}

impl FraudClass {
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            FraudClass::Legitimate
        } else {
            FraudClass::Fraud
        }
    }

    pub fn as_label(self) -> u8 {
        match self {
            FraudClass::Legitimate => 0,
            FraudClass::Fraud => 1,
        }
    }

    /// Verdict text used in the history export.
    pub fn verdict(self) -> &'static str {
        match self {
            FraudClass::Legitimate => "Low Risk",
            FraudClass::Fraud => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: FraudClass,
    /// Probability of the fraud class, in [0, 1].
    pub fraud_probability: f64,
}

impl Prediction {
    /// Probability shown on the verdict card: fraud risk when flagged,
    /// safety otherwise.
    pub fn headline_probability(&self) -> f64 {
        match self.class {
            FraudClass::Fraud => self.fraud_probability,
            FraudClass::Legitimate => 1.0 - self.fraud_probability,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.class {
            FraudClass::Fraud => "HIGH FRAUD RISK DETECTED",
            FraudClass::Legitimate => "LOW FRAUD RISK",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.class {
            FraudClass::Fraud => {
                "This application shows significant fraud indicators. Recommend manual review and additional verification."
            }
            FraudClass::Legitimate => {
                "Application appears legitimate based on current analysis. Standard processing recommended."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_probability_flips_for_legitimate() {
        let flagged = Prediction {
            class: FraudClass::Fraud,
            fraud_probability: 0.8,
        };
        let cleared = Prediction {
            class: FraudClass::Legitimate,
            fraud_probability: 0.25,
        };

        assert!((flagged.headline_probability() - 0.8).abs() < 1e-12);
        assert!((cleared.headline_probability() - 0.75).abs() < 1e-12);
        assert_eq!(cleared.class.verdict(), "Low Risk");
    }
}
