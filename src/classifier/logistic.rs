use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn check_shape(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "expected {n_features} coefficients, found {}",
                self.coefficients.len()
            ));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".to_string());
        }
        Ok(())
    }

    /// Log-odds of fraud.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    pub fn predict_fraud_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Absolute coefficients, normalized. Inputs are standardized, so
    /// magnitudes are comparable across features.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut importances: Vec<f64> = self.coefficients.iter().map(|c| c.abs()).collect();
        super::forest::normalize(&mut importances);
        importances
    }
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_logistic_of_linear_score() {
        let model = LogisticRegression {
            coefficients: vec![0.0, 0.0, 2.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0],
            intercept: -0.5,
        };
        let mut x = vec![0.0; 10];
        x[2] = 1.0;
        x[6] = 0.5;

        assert!((model.decision_function(&x) - 1.0).abs() < 1e-12);
        assert!((model.predict_fraud_proba(&x) - sigmoid(1.0)).abs() < 1e-12);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn importances_use_coefficient_magnitude() {
        let model = LogisticRegression {
            coefficients: vec![1.0, -3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
        };
        let importances = model.feature_importances();
        assert!((importances[0] - 0.25).abs() < 1e-12);
        assert!((importances[1] - 0.75).abs() < 1e-12);
    }
}
