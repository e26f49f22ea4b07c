//! Random forest classifier.
//!
//! Each tree is grown on a bootstrap sample of the training rows and looks
//! at a random subset of features per split. The forest probability is the
//! mean of the trees' leaf probabilities.
//!
//! # Example
//!
//! ```rust
//! use loan_approval::dataset::InMemoryDataset;
//! use loan_approval::model::{Classifier, ForestParams, RandomForest};
//! use ndarray::array;
//!
//! let x: Vec<&[f64]> = vec![&[1.0][..], &[2.0][..], &[10.0][..], &[11.0][..]];
//! let data = InMemoryDataset::from_rows(&x, &[0, 0, 1, 1]).unwrap();
//!
//! let params = ForestParams { n_estimators: 25, ..ForestParams::default() };
//! let forest = RandomForest::new(params).unwrap().fit(&data).unwrap();
//! assert_eq!(forest.predict(array![10.5].view()), 1);
//! ```

use crate::dataset::InMemoryDataset;
use crate::error::{LoanError, Result};
use crate::model::state::{Fitted, Unfitted};
use crate::model::tree::{DecisionTree, TreeNode, TreeParams};
use crate::model::Classifier;
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::debug;

/// How many features each split may consider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`, at least one.
    #[default]
    Sqrt,
    /// `floor(log2(n_features))`, at least one.
    Log2,
    /// Every feature.
    All,
    /// A fixed number, capped at `n_features`.
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(k) => k.min(n_features),
        };
        n.max(1)
    }
}

/// Forest hyperparameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: Some(5),
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(LoanError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(LoanError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(LoanError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.max_features == MaxFeatures::Count(0) {
            return Err(LoanError::InvalidParameter(
                "max_features count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Plain-data form of a fitted forest, for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestModelParams {
    pub params: ForestParams,
    pub n_features: usize,
    /// Node arena of each tree.
    pub trees: Vec<Vec<TreeNode>>,
}

/// Random forest typed by its training state.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomForest<S = Fitted> {
    params: ForestParams,
    trees: Vec<DecisionTree>,
    n_features: usize,
    _state: PhantomData<S>,
}

impl RandomForest<Unfitted> {
    pub fn new(params: ForestParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            trees: Vec::new(),
            n_features: 0,
            _state: PhantomData,
        })
    }

    /// Grow `n_estimators` trees on `data`.
    ///
    /// Tree seeds are drawn in order from one generator seeded with
    /// `params.seed`, so the same data and parameters give the same forest.
    pub fn fit(self, data: &InMemoryDataset) -> Result<RandomForest<Fitted>> {
        if data.is_empty() {
            return Err(LoanError::EmptyData(
                "Cannot fit RandomForest on empty data".to_string(),
            ));
        }
        let n = data.len();
        let n_features = data.n_features();
        let tree_params = TreeParams {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            max_features: self.params.max_features.resolve(n_features),
        };
        debug!(
            n_estimators = self.params.n_estimators,
            rows = n,
            features = n_features,
            max_features = tree_params.max_features,
            "growing random forest"
        );

        let mut master = StdRng::seed_from_u64(self.params.seed);
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        for _ in 0..self.params.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.random());
            let indices: Vec<usize> = if self.params.bootstrap {
                (0..n).map(|_| rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(DecisionTree::fit(
                data.features(),
                data.labels(),
                &indices,
                tree_params,
                &mut rng,
            )?);
        }

        Ok(RandomForest {
            params: self.params,
            trees,
            n_features,
            _state: PhantomData,
        })
    }
}

impl RandomForest<Fitted> {
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn extract_params(&self) -> ForestModelParams {
        ForestModelParams {
            params: self.params,
            n_features: self.n_features,
            trees: self.trees.iter().map(|t| t.nodes().to_vec()).collect(),
        }
    }

    pub fn from_params(params: ForestModelParams) -> Result<Self> {
        params.params.validate()?;
        if params.trees.is_empty() {
            return Err(LoanError::InvalidParameter("forest has no trees".to_string()));
        }
        let trees = params
            .trees
            .into_iter()
            .map(|nodes| DecisionTree::from_nodes(nodes, params.n_features))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            params: params.params,
            trees,
            n_features: params.n_features,
            _state: PhantomData,
        })
    }
}

impl Classifier for RandomForest<Fitted> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: ArrayView1<'_, f64>) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_proba(x)).sum();
        total / self.trees.len() as f64
    }
}
