//! Training data held in memory.
//!
//! A cleaned table becomes an [`InMemoryDataset`]: a feature matrix `X` of
//! shape `(n_samples, n_features)` and a class vector `y` of shape
//! `(n_samples,)` with values `0` (rejected) or `1` (approved).
//!
//! # Example
//!
//! ```rust
//! use loan_approval::dataset::InMemoryDataset;
//!
//! let x = [[1.0, 0.0], [2.0, 1.0], [3.0, 1.0], [4.0, 0.0], [5.0, 1.0]];
//! let rows: Vec<&[f64]> = x.iter().map(|r| r.as_slice()).collect();
//! let dataset = InMemoryDataset::from_rows(&rows, &[0, 1, 1, 0, 1]).unwrap();
//!
//! let (train, test) = dataset.train_test_split(0.2, 42).unwrap();
//! assert_eq!(train.len(), 4);
//! assert_eq!(test.len(), 1);
//! ```

pub mod memory;
pub use self::memory::InMemoryDataset;
