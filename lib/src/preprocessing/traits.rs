//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Unfitted; learns its parameters from training rows.
//! - [`FittedTransformer`]: Fitted; applies those parameters to new rows and
//!   exposes them as a serializable value.

use crate::error::Result;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers.
///
/// A transformer learns parameters from training data (column medians, the
/// set of observed categories) and then transforms data with them.
///
/// # Example
/// ```ignore
/// use loan_approval::preprocessing::{MedianImputer, Transformer, FittedTransformer};
///
/// let fitted = MedianImputer.fit(&coded_rows)?;
/// let filled = fitted.transform(&coded_rows)?;
/// ```
pub trait Transformer: Clone {
    /// Training data the transformer learns from.
    type Input: ?Sized;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns an error if the data is empty or a learned statistic is undefined.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Number of input fields the transformer consumes per record.
    fn n_features_in(&self) -> usize;
}
