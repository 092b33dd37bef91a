use serde::{Deserialize, Serialize};

/// Binary confusion matrix, fraud as the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        let mut cm = ConfusionMatrix::default();
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a, p) {
                (0, 0) => cm.true_negative += 1,
                (0, _) => cm.false_positive += 1,
                (_, 0) => cm.false_negative += 1,
                _ => cm.true_positive += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Rows are actual [legitimate, fraud], columns predicted.
    pub fn as_grid(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        let accuracy = ratio(cm.true_positive + cm.true_negative, cm.total());
        let precision = ratio(cm.true_positive, cm.true_positive + cm.false_positive);
        let recall = ratio(cm.true_positive, cm.true_positive + cm.false_negative);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// ROC points from descending score thresholds. Tied scores collapse into
/// one point so the curve does not depend on input order.
pub fn roc_curve(actual: &[u8], scores: &[f64]) -> RocCurve {
    let mut pairs: Vec<(f64, bool)> = scores
        .iter()
        .zip(actual)
        .map(|(&score, &label)| (score, label == 1))
        .collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let n_pos = pairs.iter().filter(|(_, positive)| *positive).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;
    let rate = |count: f64, total: f64| if total == 0.0 { 0.0 } else { count / total };

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };

    let (mut tp, mut fp) = (0.0, 0.0);
    let mut i = 0;
    while i < pairs.len() {
        let threshold = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == threshold {
            if pairs[i].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        curve.fpr.push(rate(fp, n_neg));
        curve.tpr.push(rate(tp, n_pos));
        curve.thresholds.push(threshold);
    }

    curve
}

/// Trapezoidal area under a curve given by increasing x.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_counts_and_scores() {
        let actual = [0, 0, 1, 1, 1, 0];
        let predicted = [0, 1, 1, 1, 0, 0];
        let cm = ConfusionMatrix::from_labels(&actual, &predicted);

        assert_eq!(cm.as_grid(), [[2, 1], [1, 2]]);
        let metrics = ClassificationMetrics::from_confusion(&cm);
        assert!((metrics.accuracy - 4.0 / 6.0).abs() < 1e-12);
        assert!((metrics.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_ranking_has_unit_auc() {
        let curve = roc_curve(&[0, 0, 1, 1], &[0.1, 0.2, 0.8, 0.9]);
        assert!((auc(&curve.fpr, &curve.tpr) - 1.0).abs() < 1e-12);
        assert_eq!(curve.fpr.first(), Some(&0.0));
        assert_eq!(curve.tpr.last(), Some(&1.0));
    }

    #[test]
    fn tied_scores_give_chance_auc() {
        let curve = roc_curve(&[0, 1, 0, 1], &[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(curve.fpr, vec![0.0, 1.0]);
        assert!((auc(&curve.fpr, &curve.tpr) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_confusion_is_all_zero() {
        let metrics = ClassificationMetrics::from_confusion(&ConfusionMatrix::default());
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }
}
