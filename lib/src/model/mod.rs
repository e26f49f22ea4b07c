//! Binary classifiers and the persisted model artifact.
//!
//! - [`DecisionTree`]: a CART tree grown on Gini impurity.
//! - [`RandomForest`]: bagged trees with feature subsampling, typed by
//!   training state ([`Unfitted`] / [`Fitted`]).
//! - [`TrainedModel`]: a fitted forest bundled with the feature schema it
//!   was trained under, the unit that is saved and loaded.

use ndarray::{Array1, ArrayView1, ArrayView2};

pub mod artifact;
pub mod forest;
pub mod state;
pub mod tree;

pub use artifact::{TrainedModel, TrainedModelParams, TrainingSummary, MODEL_FORMAT};
pub use forest::{ForestModelParams, ForestParams, MaxFeatures, RandomForest};
pub use state::{Fitted, Unfitted};
pub use tree::{DecisionTree, TreeNode};

/// Probability above which a row is assigned class `1`.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A trained binary classifier.
///
/// Inputs must have exactly [`n_features`](Classifier::n_features) entries,
/// in the order the model was trained on.
pub trait Classifier {
    /// Number of features each input row must have.
    fn n_features(&self) -> usize;

    /// Probability that `x` belongs to class `1`.
    fn predict_proba(&self, x: ArrayView1<'_, f64>) -> f64;

    /// Class label for `x`: `1` iff the probability exceeds [`DECISION_THRESHOLD`].
    fn predict(&self, x: ArrayView1<'_, f64>) -> u8 {
        u8::from(self.predict_proba(x) > DECISION_THRESHOLD)
    }

    /// Class labels for every row of `x`.
    fn predict_batch(&self, x: ArrayView2<'_, f64>) -> Array1<u8> {
        x.rows().into_iter().map(|row| self.predict(row)).collect()
    }
}
