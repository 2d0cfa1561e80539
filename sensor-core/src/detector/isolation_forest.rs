//! Isolation Forest for anomaly detection
//!
//! Each tree isolates points with random axis-aligned splits. Points that
//! are isolated after few splits (short average path) score close to 1.

use rand::prelude::*;

use crate::schema::FEATURE_COUNT;

/// One row of the feature matrix
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Euler-Mascheroni constant
const EULER_GAMMA: f64 = 0.5772156649;

/// Score used when the forest cannot discriminate (fewer than 2 samples)
const NEUTRAL_SCORE: f64 = 0.5;

/// Isolation Tree node
#[derive(Debug, Clone)]
enum IsolationNode {
    Internal {
        feature_idx: usize,
        split_value: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

/// Single Isolation Tree
#[derive(Debug, Clone)]
pub struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    /// Build a tree over the rows selected by `indices`
    pub fn build(data: &[FeatureRow], indices: &[usize], max_depth: usize, rng: &mut impl Rng) -> Self {
        Self {
            root: Self::build_node(data, indices, 0, max_depth, rng),
        }
    }

    fn build_node(
        data: &[FeatureRow],
        indices: &[usize],
        depth: usize,
        max_depth: usize,
        rng: &mut impl Rng,
    ) -> IsolationNode {
        if depth >= max_depth || indices.len() <= 1 {
            return IsolationNode::Leaf { size: indices.len() };
        }

        // Only features with a spread can split
        let mut candidates: Vec<(usize, f64, f64)> = Vec::with_capacity(FEATURE_COUNT);
        for feature_idx in 0..FEATURE_COUNT {
            let (min_val, max_val) = indices.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &i| (lo.min(data[i][feature_idx]), hi.max(data[i][feature_idx])),
            );
            if max_val - min_val > 1e-10 {
                candidates.push((feature_idx, min_val, max_val));
            }
        }

        if candidates.is_empty() {
            return IsolationNode::Leaf { size: indices.len() };
        }

        let (feature_idx, min_val, max_val) = candidates[rng.gen_range(0..candidates.len())];
        let split_value = split_between(min_val, max_val, rng.gen::<f64>());

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| data[i][feature_idx] < split_value);

        let left = Box::new(Self::build_node(data, &left_idx, depth + 1, max_depth, rng));
        let right = Box::new(Self::build_node(data, &right_idx, depth + 1, max_depth, rng));

        IsolationNode::Internal {
            feature_idx,
            split_value,
            left,
            right,
        }
    }

    /// Path length for a sample, adjusted for unresolved leaf size
    pub fn path_length(&self, sample: &FeatureRow) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                IsolationNode::Leaf { size } => return depth as f64 + average_path_length(*size),
                IsolationNode::Internal {
                    feature_idx,
                    split_value,
                    left,
                    right,
                } => {
                    node = if sample[*feature_idx] < *split_value { left } else { right };
                    depth += 1;
                }
            }
        }
    }
}

/// Point at fraction `t` of `[min_val, max_val]`
///
/// Interpolates the endpoints instead of the width so that a range wider
/// than `f64::MAX` still yields a finite split inside it.
fn split_between(min_val: f64, max_val: f64, t: f64) -> f64 {
    (min_val * (1.0 - t) + max_val * t).clamp(min_val, max_val)
}

/// Average path length of an unsuccessful search in a BST of `n` nodes
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Isolation Forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit `n_trees` trees, each on a sub-sample of at most `max_samples` rows
    pub fn fit(data: &[FeatureRow], n_trees: usize, max_samples: usize, rng: &mut impl Rng) -> Self {
        let sample_size = max_samples.min(data.len());
        if sample_size < 2 {
            return Self {
                trees: Vec::new(),
                sample_size,
            };
        }

        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut trees = Vec::with_capacity(n_trees);

        for _ in 0..n_trees {
            let indices: Vec<usize> = (0..data.len()).choose_multiple(rng, sample_size);
            trees.push(IsolationTree::build(data, &indices, max_depth, rng));
        }

        Self { trees, sample_size }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Anomaly score in (0, 1], higher = more anomalous
    pub fn score(&self, sample: &FeatureRow) -> f64 {
        let c_n = average_path_length(self.sample_size);
        if self.trees.is_empty() || c_n < 1e-10 {
            return NEUTRAL_SCORE;
        }

        let avg_path: f64 = self.trees.iter().map(|t| t.path_length(sample)).sum::<f64>()
            / self.trees.len() as f64;

        // s(x, n) = 2^(-E(h(x)) / c(n))
        2.0_f64.powf(-avg_path / c_n)
    }

    pub fn score_all(&self, data: &[FeatureRow]) -> Vec<f64> {
        data.iter().map(|row| self.score(row)).collect()
    }
}
