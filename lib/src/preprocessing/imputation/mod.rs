//! Imputation of missing numeric cells.
//!
//! # Available Transformers
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`MedianImputer`] | Fill each base column with the median of its present values |
//!
//! # Example
//!
//! ```ignore
//! use loan_approval::preprocessing::{FittedTransformer, MedianImputer, Transformer};
//!
//! let fitted = MedianImputer.fit(&coded_rows)?;
//! let filled = fitted.transform(&coded_rows)?;
//! ```

pub mod median;

pub use median::{median, FittedMedianImputer, MedianImputer, MedianImputerParams};
