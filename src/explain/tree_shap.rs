//! Exact path-dependent TreeSHAP (Lundberg et al., Algorithm 2).
//!
//! Each tree is walked once per sample while a "unique path" of the
//! features split on so far is maintained. Every path element records the
//! fraction of background samples (`zero_fraction`) and of the explained
//! sample (`one_fraction`) flowing through it, plus a permutation weight.

use crate::classifier::forest::{DecisionTree, RandomForest};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// SHAP values of one sample for the forest's fraud probability, and the
/// expected probability they are measured from.
pub fn forest_shap(forest: &RandomForest, features: &[f64]) -> (f64, Vec<f64>) {
    let mut phi = vec![0.0; features.len()];
    let mut expected = 0.0;

    for tree in &forest.trees {
        let mut tree_phi = vec![0.0; features.len()];
        recurse(tree, features, &mut tree_phi, 0, Vec::new(), 1.0, 1.0, None);
        for (total, value) in phi.iter_mut().zip(tree_phi) {
            *total += value;
        }
        expected += expected_value(tree, 0);
    }

    let n_trees = forest.trees.len() as f64;
    for value in phi.iter_mut() {
        *value /= n_trees;
    }
    (expected / n_trees, phi)
}

/// Cover-weighted mean of the leaf probabilities below `node`.
pub fn expected_value(tree: &DecisionTree, node: usize) -> f64 {
    if tree.is_leaf(node) {
        return tree.node_fraud_probability(node);
    }
    let (left, right) = (tree.left(node), tree.right(node));
    let cover = tree.n_node_samples[left] + tree.n_node_samples[right];
    (tree.n_node_samples[left] * expected_value(tree, left)
        + tree.n_node_samples[right] * expected_value(tree, right))
        / cover
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &DecisionTree,
    features: &[f64],
    phi: &mut [f64],
    node: usize,
    mut path: Vec<PathElement>,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    extend(&mut path, zero_fraction, one_fraction, feature);

    if tree.is_leaf(node) {
        let leaf_value = tree.node_fraud_probability(node);
        for i in 1..path.len() {
            let weight = unwound_sum(&path, i);
            let element = path[i];
            if let Some(index) = element.feature {
                phi[index] += weight * (element.one_fraction - element.zero_fraction) * leaf_value;
            }
        }
        return;
    }

    let split = tree.split_feature(node);
    let (hot, cold) = if features[split] <= tree.threshold[node] {
        (tree.left(node), tree.right(node))
    } else {
        (tree.right(node), tree.left(node))
    };
    let cover = tree.n_node_samples[node];
    let hot_zero_fraction = tree.n_node_samples[hot] / cover;
    let cold_zero_fraction = tree.n_node_samples[cold] / cover;

    // A feature already on the path is unwound so this split replaces it.
    let mut incoming_zero = 1.0;
    let mut incoming_one = 1.0;
    if let Some(index) = path.iter().position(|el| el.feature == Some(split)) {
        incoming_zero = path[index].zero_fraction;
        incoming_one = path[index].one_fraction;
        unwind(&mut path, index);
    }

    recurse(
        tree,
        features,
        phi,
        hot,
        path.clone(),
        hot_zero_fraction * incoming_zero,
        incoming_one,
        Some(split),
    );
    recurse(
        tree,
        features,
        phi,
        cold,
        path,
        cold_zero_fraction * incoming_zero,
        0.0,
        Some(split),
    );
}

fn extend(path: &mut Vec<PathElement>, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / denom;
        path[i].pweight = zero_fraction * path[i].pweight * (depth - i) as f64 / denom;
    }
}

fn unwind(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let previous = path[i].pweight;
            path[i].pweight = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            next_one_portion =
                previous - path[i].pweight * zero_fraction * (depth - i) as f64 / denom;
        } else {
            path[i].pweight = path[i].pweight * denom / (zero_fraction * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
    path.truncate(depth);
}

fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let denom = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one_fraction != 0.0 {
            let share = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            total += share;
            next_one_portion = path[i].pweight - share * zero_fraction * ((depth - i) as f64 / denom);
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((depth - i) as f64 / denom);
        }
    }

    total
}
