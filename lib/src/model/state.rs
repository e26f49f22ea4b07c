/// Marker for a model that has **not been trained yet**.
///
/// Used as the type parameter of [`RandomForest`](super::RandomForest):
/// only `RandomForest<Unfitted>` has `fit`, and `fit` consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unfitted;

/// Marker for a **trained** model.
///
/// A `Fitted` model holds only what inference needs (the trees and the
/// hyperparameters they were grown with) and implements
/// [`Classifier`](super::Classifier).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fitted;
