//! Benchmark utilities for loan-approval.
//!
//! Provides synthetic raw loan tables sized for the criterion benches, so the
//! benches do not depend on a dataset checked out next to them.

pub mod data;

pub use data::{synthetic_application, synthetic_raw_csv};
