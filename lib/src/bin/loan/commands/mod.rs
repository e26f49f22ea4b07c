//! CLI command implementations.

pub mod predict;
pub mod preprocess;
pub mod serve;
pub mod status;
pub mod train;
