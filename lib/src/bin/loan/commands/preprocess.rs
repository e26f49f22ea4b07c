//! Preprocess command - cleans a raw loan CSV.

use std::path::PathBuf;

use anyhow::{Context, Result};
use loan_approval::{LoanConfig, Preprocessor};
use tracing::info;

/// Runs the preprocess command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or cleaned, or the output
/// cannot be written.
pub fn run(config: &LoanConfig, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.paths.raw_data.clone());
    let output = output.unwrap_or_else(|| config.paths.cleaned_data.clone());
    info!(input = %input.display(), output = %output.display(), "cleaning raw data");

    let report = Preprocessor::from_config(&config.preprocessing)
        .clean_file(&input, &output)
        .with_context(|| format!("failed to clean {}", input.display()))?;

    println!("Cleaned {} rows into {}", report.rows, output.display());
    println!("  features: {}", report.schema.len());
    println!("  imputed cells: {}", report.imputed_cells);
    if !report.dropped_columns.is_empty() {
        println!("  dropped columns: {}", report.dropped_columns.join(", "));
    }
    for (column, median) in &report.medians {
        println!("  median {column}: {median}");
    }
    Ok(())
}
