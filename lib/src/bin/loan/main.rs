//! `loan`: clean loan data, train the approval model, and serve decisions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loan_approval::LoanConfig;
use tracing_subscriber::EnvFilter;

mod commands;

/// Loan approval pipeline
#[derive(Parser)]
#[command(name = "loan")]
#[command(about = "Clean loan applications, train a random forest, and predict approvals")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "LOAN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw CSV into a model-ready table
    Preprocess {
        /// Raw CSV (defaults to `paths.raw_data`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned CSV to write (defaults to `paths.cleaned_data`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Train the random forest on a cleaned table
    Train {
        /// Cleaned CSV (defaults to `paths.cleaned_data`)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Model file to write (defaults to `paths.model`)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Do nothing if the model file already exists
        #[arg(long)]
        skip_if_exists: bool,
    },

    /// Report whether a trained model is present
    Status {
        /// Model file (defaults to `paths.model`)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Predict approval for one application given on the command line
    Predict(commands::predict::PredictArgs),

    /// Answer JSON applications read line by line from stdin
    Serve {
        /// Model file (defaults to `paths.model`)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = LoanConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Preprocess { input, output } => {
            commands::preprocess::run(&config, input, output)?;
        }
        Commands::Train {
            data,
            model,
            skip_if_exists,
        } => {
            commands::train::run(&config, data, model, skip_if_exists)?;
        }
        Commands::Status { model } => {
            commands::status::run(&config, model)?;
        }
        Commands::Predict(args) => {
            commands::predict::run(&config, args)?;
        }
        Commands::Serve { model } => {
            commands::serve::run(&config, model)?;
        }
    }

    Ok(())
}
