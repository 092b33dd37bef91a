use serde::{Deserialize, Serialize};

/// Marks an absent child in the node arrays.
pub const TREE_LEAF: i64 = -1;

/// A fitted binary classification tree in struct-of-arrays form, one entry
/// per node. Node 0 is the root; an internal node routes `x[feature] <=
/// threshold` to its left child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Class distribution `[legitimate, fraud]` of the training samples
    /// reaching each node, as counts or fractions.
    pub value: Vec<Vec<f64>>,
    pub impurity: Vec<f64>,
    pub n_node_samples: Vec<f64>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    pub fn left(&self, node: usize) -> usize {
        self.children_left[node] as usize
    }

    pub fn right(&self, node: usize) -> usize {
        self.children_right[node] as usize
    }

    pub fn split_feature(&self, node: usize) -> usize {
        self.feature[node] as usize
    }

    pub fn check_shape(&self, n_features: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        let lengths = [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
            self.impurity.len(),
            self.n_node_samples.len(),
        ];
        if lengths.iter().any(|len| *len != n) {
            return Err(format!("node arrays disagree on length (expected {n})"));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if self.value[node].len() != 2 || self.value[node].iter().any(|v| *v < 0.0 || !v.is_finite()) {
                return Err(format!("node {node} must hold two non-negative class weights"));
            }
            if self.n_node_samples[node] <= 0.0 {
                return Err(format!("node {node} has no samples"));
            }

            if left == TREE_LEAF && right == TREE_LEAF {
                if self.value[node].iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {node} has an empty class distribution"));
                }
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            let in_range = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_range(left) || !in_range(right) {
                return Err(format!("node {node} has children out of range"));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }

        Ok(())
    }

    pub fn leaf_for(&self, features: &[f64]) -> usize {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = if features[self.split_feature(node)] <= self.threshold[node] {
                self.left(node)
            } else {
                self.right(node)
            };
        }
        node
    }

    /// Fraud share of the class distribution stored at `node`.
    pub fn node_fraud_probability(&self, node: usize) -> f64 {
        let total: f64 = self.value[node].iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.value[node][1] / total
    }

    pub fn predict_fraud_proba(&self, features: &[f64]) -> f64 {
        self.node_fraud_probability(self.leaf_for(features))
    }

    /// Mean decrease in impurity per feature, normalized to sum to 1.
    pub fn impurity_importances(&self, n_features: usize) -> Vec<f64> {
        let mut importances = vec![0.0; n_features];
        for node in 0..self.node_count() {
            if self.is_leaf(node) {
                continue;
            }
            let (left, right) = (self.left(node), self.right(node));
            let decrease = self.n_node_samples[node] * self.impurity[node]
                - self.n_node_samples[left] * self.impurity[left]
                - self.n_node_samples[right] * self.impurity[right];
            importances[self.split_feature(node)] += decrease;
        }

        let root_samples = self.n_node_samples[0];
        for value in importances.iter_mut() {
            *value /= root_samples;
        }
        normalize(&mut importances);
        importances
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn check_shape(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.check_shape(n_features)
                .map_err(|e| format!("tree {index}: {e}"))?;
        }
        Ok(())
    }

    /// Mean of the per-tree leaf probabilities.
    pub fn predict_fraud_proba(&self, features: &[f64]) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_fraud_proba(features))
            .sum();
        total / self.trees.len() as f64
    }

    pub fn feature_importances(&self, n_features: usize) -> Vec<f64> {
        let mut importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (total, value) in importances.iter_mut().zip(tree.impurity_importances(n_features)) {
                *total += value;
            }
        }
        for value in importances.iter_mut() {
            *value /= self.trees.len() as f64;
        }
        normalize(&mut importances);
        importances
    }
}

pub(crate) fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > f64::EPSILON {
        for value in values.iter_mut() {
            *value /= sum;
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Root splits on feature 2 (ltv) at 80; the right branch splits on
    /// feature 8 (credit score) at 650.
    pub fn ltv_credit_tree() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            feature: vec![2, -2, 8, -2, -2],
            threshold: vec![80.0, -2.0, 650.0, -2.0, -2.0],
            value: vec![
                vec![60.0, 40.0],
                vec![45.0, 5.0],
                vec![15.0, 35.0],
                vec![2.0, 28.0],
                vec![13.0, 7.0],
            ],
            impurity: vec![0.48, 0.18, 0.42, 0.124_444, 0.455],
            n_node_samples: vec![100.0, 50.0, 50.0, 30.0, 20.0],
        }
    }

    /// Single split on feature 6 (OCR confidence) at 0.7.
    pub fn ocr_stump() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![6, -2, -2],
            threshold: vec![0.7, -2.0, -2.0],
            value: vec![vec![0.5, 0.5], vec![0.2, 0.8], vec![0.8, 0.2]],
            impurity: vec![0.5, 0.32, 0.32],
            n_node_samples: vec![80.0, 40.0, 40.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn features(ltv: f64, credit: f64, ocr: f64) -> Vec<f64> {
        let mut x = vec![0.0; 10];
        x[2] = ltv;
        x[6] = ocr;
        x[8] = credit;
        x
    }

    #[test]
    fn routes_to_expected_leaf() {
        let tree = ltv_credit_tree();
        assert_eq!(tree.leaf_for(&features(70.0, 500.0, 0.9)), 1);
        assert_eq!(tree.leaf_for(&features(80.0, 500.0, 0.9)), 1);
        assert_eq!(tree.leaf_for(&features(95.0, 600.0, 0.9)), 3);
        assert_eq!(tree.leaf_for(&features(95.0, 700.0, 0.9)), 4);
        assert!((tree.predict_fraud_proba(&features(95.0, 600.0, 0.9)) - 28.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn forest_averages_tree_probabilities() {
        let forest = RandomForest {
            trees: vec![ltv_credit_tree(), ocr_stump()],
        };
        let p = forest.predict_fraud_proba(&features(95.0, 600.0, 0.5));
        assert!((p - (28.0 / 30.0 + 0.8) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn importances_sum_to_one() {
        let forest = RandomForest {
            trees: vec![ltv_credit_tree(), ocr_stump()],
        };
        let importances = forest.feature_importances(10);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(importances[2] > 0.0);
        assert!(importances[6] > 0.0);
        assert!(importances[8] > 0.0);
        assert_eq!(importances[0], 0.0);
    }

    #[test]
    fn shape_check_rejects_bad_trees() {
        assert!(ltv_credit_tree().check_shape(10).is_ok());

        let mut backwards = ltv_credit_tree();
        backwards.children_left[2] = 0;
        assert!(backwards.check_shape(10).is_err());

        let mut unknown_feature = ltv_credit_tree();
        unknown_feature.feature[0] = 12;
        assert!(unknown_feature.check_shape(10).is_err());

        let mut ragged = ocr_stump();
        ragged.threshold.pop();
        assert!(ragged.check_shape(10).is_err());

        assert!(RandomForest { trees: vec![] }.check_shape(10).is_err());
    }
}
