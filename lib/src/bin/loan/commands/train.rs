//! Train command - fits the random forest on a cleaned table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use loan_approval::{LoanConfig, Trainer};
use tracing::info;

/// Runs the train command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the data cannot be read,
/// training fails, or the model cannot be saved.
pub fn run(
    config: &LoanConfig,
    data: Option<PathBuf>,
    model: Option<PathBuf>,
    skip_if_exists: bool,
) -> Result<()> {
    let data = data.unwrap_or_else(|| config.paths.cleaned_data.clone());
    let model_path = model.unwrap_or_else(|| config.paths.model.clone());

    if skip_if_exists && model_path.exists() {
        info!(path = %model_path.display(), "model already exists, skipping training");
        println!("Model already present at {}", model_path.display());
        return Ok(());
    }

    let trainer = Trainer::from_config(&config.training)?;
    let model = trainer
        .fit_file(&data, &model_path)
        .with_context(|| format!("failed to train on {}", data.display()))?;

    let summary = model.summary();
    println!("Model saved to {}", model_path.display());
    println!(
        "  rows: {} train / {} test",
        summary.train_rows, summary.test_rows
    );
    println!("  test {}", summary.metrics);
    Ok(())
}
