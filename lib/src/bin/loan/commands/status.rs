//! Status command - reports whether a trained model is available.

use std::path::PathBuf;

use anyhow::{Context, Result};
use loan_approval::{Classifier, LoanConfig, TrainedModel};

/// Runs the status command.
///
/// A missing model is reported, not treated as an error.
///
/// # Errors
///
/// Returns an error if a model file exists but cannot be loaded.
pub fn run(config: &LoanConfig, model: Option<PathBuf>) -> Result<()> {
    let path = model.unwrap_or_else(|| config.paths.model.clone());
    if !path.exists() {
        println!("No trained model at {}", path.display());
        println!("Run `loan preprocess` and `loan train` to create one.");
        return Ok(());
    }

    let model = TrainedModel::load(&path)
        .with_context(|| format!("model at {} is unreadable", path.display()))?;
    let summary = model.summary();
    let forest = model.forest();
    println!("Model: {}", path.display());
    println!("  schema: {}", model.encoder().fingerprint());
    println!("  features: {}", forest.n_features());
    println!("  trees: {}", forest.trees().len());
    println!(
        "  rows: {} train / {} test",
        summary.train_rows, summary.test_rows
    );
    println!("  test {}", summary.metrics);
    Ok(())
}
