//! CART decision tree for binary classification.
//!
//! Nodes live in a flat arena; the root is node `0` and children always
//! come after their parent. Rows with `x[feature] <= threshold` go left.

use crate::error::{LoanError, Result};
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One node of a [`DecisionTree`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node holding the class-`1` fraction of its training rows.
    Leaf { proba: f64, samples: usize },
    /// Internal node; `left` and `right` index into the tree's node arena.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Growth limits for a single tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Number of non-constant features examined per split.
    pub max_features: usize,
}

/// A fitted tree. Persisted as its node list, see [`DecisionTree::from_nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

#[derive(Clone, Copy, Debug)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Gini impurity of a node with `positives` class-`1` rows out of `n`.
fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

struct Grower<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, u8>,
    params: TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<TreeNode>,
}

impl Grower<'_> {
    fn leaf(&mut self, indices: &[usize]) -> usize {
        let positives = indices.iter().filter(|&&i| self.y[i] == 1).count();
        self.nodes.push(TreeNode::Leaf {
            proba: positives as f64 / indices.len() as f64,
            samples: indices.len(),
        });
        self.nodes.len() - 1
    }

    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let n = indices.len();
        let positives = indices.iter().filter(|&&i| self.y[i] == 1).count();
        let pure = positives == 0 || positives == n;
        let too_deep = self.params.max_depth.is_some_and(|d| depth >= d);
        if pure || too_deep || n < self.params.min_samples_split {
            return self.leaf(&indices);
        }

        let Some(split) = self.best_split(&indices, positives) else {
            return self.leaf(&indices);
        };
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[[i, split.feature]] <= split.threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return self.leaf(&indices);
        }

        let id = self.nodes.len();
        // Placeholder, replaced once both children exist.
        self.nodes.push(TreeNode::Leaf {
            proba: 0.0,
            samples: n,
        });
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[id] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(&mut self, indices: &[usize], positives: usize) -> Option<BestSplit> {
        let n = indices.len();
        let mut order: Vec<usize> = (0..self.x.ncols()).collect();
        order.shuffle(&mut *self.rng);

        let mut best: Option<BestSplit> = None;
        let mut examined = 0;
        let mut column: Vec<(f64, u8)> = Vec::with_capacity(n);

        for feature in order {
            if examined == self.params.max_features {
                break;
            }
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[[i, feature]], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));
            if column[0].0 == column[n - 1].0 {
                continue;
            }
            examined += 1;

            let mut left_pos = 0;
            for k in 0..n - 1 {
                left_pos += usize::from(column[k].1 == 1);
                if column[k].0 == column[k + 1].0 {
                    continue;
                }
                let n_left = k + 1;
                let n_right = n - n_left;
                let impurity = (n_left as f64 * gini(left_pos, n_left)
                    + n_right as f64 * gini(positives - left_pos, n_right))
                    / n as f64;
                if best.map_or(true, |b| impurity < b.impurity) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (column[k].0 + column[k + 1].0) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` listed in `indices` (repeats allowed).
    pub fn fit(
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
        indices: &[usize],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if indices.is_empty() {
            return Err(LoanError::EmptyData(
                "Cannot grow a tree without rows".to_string(),
            ));
        }
        if params.max_features == 0 {
            return Err(LoanError::InvalidParameter(
                "max_features must be at least 1".to_string(),
            ));
        }
        let n_features = x.ncols();
        let mut grower = Grower {
            x: x.reborrow(),
            y: y.reborrow(),
            params,
            rng,
            nodes: Vec::new(),
        };
        grower.grow(indices.to_vec(), 0);
        Ok(Self {
            nodes: grower.nodes,
            n_features,
        })
    }

    /// Rebuild a tree from its nodes, checking that every child index
    /// points forward and every split feature exists.
    pub fn from_nodes(nodes: Vec<TreeNode>, n_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(LoanError::InvalidParameter("tree has no nodes".to_string()));
        }
        for (id, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    let in_range = |child: usize| child > id && child < nodes.len();
                    if *feature >= n_features || !in_range(*left) || !in_range(*right) {
                        return Err(LoanError::InvalidParameter(format!(
                            "malformed split at node {id}"
                        )));
                    }
                }
                TreeNode::Leaf { proba, .. } => {
                    if !(0.0..=1.0).contains(proba) {
                        return Err(LoanError::InvalidParameter(format!(
                            "leaf {id} has probability {proba}"
                        )));
                    }
                }
            }
        }
        Ok(Self { nodes, n_features })
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], id: usize) -> usize {
            match &nodes[id] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }

    /// Class-`1` fraction of the leaf `x` falls into.
    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                TreeNode::Leaf { proba, .. } => return *proba,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use rand::SeedableRng;

    fn params(max_depth: Option<usize>, max_features: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            max_features,
        }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(0, 4), 0.0);
        assert_eq!(gini(4, 4), 0.0);
        assert_eq!(gini(2, 4), 0.5);
    }

    #[test]
    fn test_single_threshold() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![0, 0, 0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree =
            DecisionTree::fit(x.view(), y.view(), &[0, 1, 2, 3, 4, 5], params(None, 1), &mut rng)
                .unwrap();

        assert_eq!(tree.depth(), 1);
        match &tree.nodes()[0] {
            TreeNode::Split { threshold, .. } => assert_eq!(*threshold, 6.5),
            other => panic!("expected split, got {other:?}"),
        }
        assert_eq!(tree.predict_proba(array![2.5].view()), 0.0);
        assert_eq!(tree.predict_proba(array![6.5].view()), 0.0);
        assert_eq!(tree.predict_proba(array![7.0].view()), 1.0);
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 separates the classes.
        let x = array![
            [5.0, 0.0],
            [1.0, 0.0],
            [4.0, 0.0],
            [2.0, 1.0],
            [5.0, 1.0],
            [1.0, 1.0]
        ];
        let y = array![0, 0, 0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(3);
        let tree =
            DecisionTree::fit(x.view(), y.view(), &[0, 1, 2, 3, 4, 5], params(None, 2), &mut rng)
                .unwrap();
        match &tree.nodes()[0] {
            TreeNode::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 1);
                assert_eq!(*threshold, 0.5);
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit_and_leaf_fraction() {
        // XOR needs two levels; depth 1 leaves mixed leaves.
        let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = array![0, 1, 1, 0];
        let mut rng = StdRng::seed_from_u64(1);
        let tree =
            DecisionTree::fit(x.view(), y.view(), &[0, 1, 2, 3], params(Some(1), 2), &mut rng)
                .unwrap();
        assert!(tree.depth() <= 1);
        for row in x.rows() {
            let p = tree.predict_proba(row);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_constant_features_make_a_leaf() {
        let x = Array2::from_elem((4, 3), 7.0);
        let y = array![0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(9);
        let tree =
            DecisionTree::fit(x.view(), y.view(), &[0, 1, 2, 3], params(None, 1), &mut rng)
                .unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.predict_proba(array![7.0, 7.0, 7.0].view()), 0.75);
    }

    #[test]
    fn test_bootstrap_repeats_weight_the_leaf() {
        let x = array![[1.0], [2.0]];
        let y = array![0, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTree::fit(x.view(), y.view(), &[1, 1, 1], params(None, 1), &mut rng)
            .unwrap();
        assert_eq!(
            tree.nodes(),
            &[TreeNode::Leaf {
                proba: 1.0,
                samples: 3
            }]
        );
    }

    #[test]
    fn test_from_nodes_rejects_cycles_and_bad_features() {
        let back_edge = vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf {
                proba: 1.0,
                samples: 1,
            },
        ];
        assert!(DecisionTree::from_nodes(back_edge, 1).is_err());

        let bad_feature = vec![
            TreeNode::Split {
                feature: 4,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf {
                proba: 0.0,
                samples: 1,
            },
            TreeNode::Leaf {
                proba: 1.0,
                samples: 1,
            },
        ];
        assert!(DecisionTree::from_nodes(bad_feature.clone(), 2).is_err());
        assert!(DecisionTree::from_nodes(bad_feature, 5).is_ok());
        assert!(DecisionTree::from_nodes(Vec::new(), 1).is_err());
    }
}
