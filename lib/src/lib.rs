//! # loan-approval
//!
//! Cleaning of loan-application tables, random-forest training, and
//! approval prediction for single applications.
//!
//! ## Core Design Principles
//!
//! - **One encoding path**: the table cleaner and the predictor encode
//!   records through the same fitted encoder, and the feature order is an
//!   explicit, versioned [`FeatureSchema`] stored inside the model file.
//! - **Stateful Type Safety**: forests carry their training state in the type
//!   (`RandomForest<Unfitted>` / `RandomForest<Fitted>`), and a predictor can
//!   only predict once its model is loaded (`Predictor<Ready>`).
//! - **Reproducible**: cleaning is deterministic, and the train/test split and
//!   every tree are seeded.
//!
//! ## Quick Start
//!
//! ```ignore
//! use loan_approval::{Predictor, PredictorConfig, Preprocessor, Trainer};
//!
//! Preprocessor::new().clean_file("data/Finance.csv", "data/cleaned_data.csv")?;
//! Trainer::builder().build()?.fit_file("data/cleaned_data.csv", "model/model.bin")?;
//!
//! let predictor = Predictor::new(PredictorConfig::new("model/model.bin")).load()?;
//! let prediction = predictor.predict(&application)?;
//! ```
//!
//! ## Module Structure
//!
//! - `record`: raw loan rows and complete applications
//! - `preprocessing`: dictionaries, median imputation, one-hot schema, table I/O
//! - `dataset`: in-memory feature matrix and seeded train/test split
//! - `model`: decision tree, random forest, persisted model artifact
//! - `metrics`: binary classification metrics
//! - `trainer`: split, fit, evaluate, save
//! - `predictor`: model lifecycle, decisions and advisory reasons
//! - `config`: TOML configuration
//! - `serialization`: byte-level contract for persisted parameters

/// Project configuration.
pub mod config;

/// Training data held in memory.
pub mod dataset;

/// Error type shared across the crate.
pub mod error;

/// Binary classification metrics.
pub mod metrics;

/// Decision trees, random forests and the persisted model.
pub mod model;

/// Model lifecycle and single-application predictions.
pub mod predictor;

/// Cleaning and encoding of loan tables.
pub mod preprocessing;

/// Raw loan records and complete applications.
pub mod record;

/// Serialization of fitted parameters.
pub mod serialization;

/// Training orchestration.
pub mod trainer;

pub use config::LoanConfig;
pub use error::{LoanError, Result};
pub use model::{Classifier, RandomForest, TrainedModel};
pub use predictor::{Decision, Prediction, Predictor, PredictorConfig, RejectionReason};
pub use preprocessing::{CleanedTable, FeatureSchema, Preprocessor, RawTable};
pub use record::{LoanApplication, LoanRecord};
pub use trainer::Trainer;
