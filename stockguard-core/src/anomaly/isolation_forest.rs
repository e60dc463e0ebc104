//! Isolation forest.
//!
//! Trees partition a random sub-sample with random axis-aligned splits;
//! points that isolate in few splits are anomalous. Scores follow the
//! standard normalization `2^(-E[h(x)] / c(psi))`, so values approach 1.0
//! for clear anomalies and sit near 0.5 for unremarkable points.
//!
//! Trees are built in parallel. Each tree draws its RNG from a BLAKE3
//! sub-seed keyed by tree index, so the fitted forest is identical across
//! thread counts and scheduling orders.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::Rng;
use rayon::prelude::*;

use crate::rng::SeedHierarchy;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

struct Tree {
    root: Node,
}

impl Tree {
    /// Path length from root to the leaf holding `row`, with the usual
    /// `c(size)` adjustment for points that never fully isolate.
    fn path_length(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
        }
    }
}

fn build_node(
    data: ArrayView2<'_, f64>,
    rows: &[usize],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if rows.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: rows.len() };
    }

    // Candidate features are those not constant over the current subset.
    let n_features = data.ncols();
    let mut candidates = Vec::with_capacity(n_features);
    for f in 0..n_features {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &r in rows {
            let v = data[(r, f)];
            min = min.min(v);
            max = max.max(v);
        }
        if min < max {
            candidates.push((f, min, max));
        }
    }
    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
        rows.iter().partition(|&&r| data[(r, feature)] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(data, &left_rows, depth + 1, max_depth, rng)),
        right: Box::new(build_node(data, &right_rows, depth + 1, max_depth, rng)),
    }
}

/// Fitted isolation forest over an `(n_samples, n_features)` matrix.
pub struct IsolationForest {
    trees: Vec<Tree>,
    sample_size: usize,
}

impl IsolationForest {
    pub const DEFAULT_N_TREES: usize = 100;
    pub const MAX_SAMPLE_SIZE: usize = 256;

    /// Fit `n_trees` trees, each over a random sub-sample of at most
    /// [`Self::MAX_SAMPLE_SIZE`] rows drawn without replacement.
    pub fn fit(data: ArrayView2<'_, f64>, n_trees: usize, seeds: &SeedHierarchy) -> Self {
        let n = data.nrows();
        let sample_size = n.min(Self::MAX_SAMPLE_SIZE).max(1);
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let trees: Vec<Tree> = (0..n_trees as u64)
            .into_par_iter()
            .map(|i| {
                let mut rng = seeds.rng_for("tree", i);
                let rows = sample(&mut rng, n, sample_size).into_vec();
                Tree {
                    root: build_node(data, &rows, 0, max_depth, &mut rng),
                }
            })
            .collect();

        Self { trees, sample_size }
    }

    /// Anomaly score per row, each in `(0, 1)`, higher = more anomalous.
    pub fn score_samples(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        let norm = average_path_length(self.sample_size);
        data.outer_iter()
            .map(|row| {
                let mean_path: f64 = self
                    .trees
                    .iter()
                    .map(|t| t.path_length(row))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                if norm > 0.0 {
                    2.0_f64.powf(-mean_path / norm)
                } else {
                    0.5
                }
            })
            .collect()
    }
}
