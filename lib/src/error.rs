//! Error type shared by preprocessing, training and prediction.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = LoanError> = std::result::Result<T, E>;

/// Errors raised while cleaning data, training, or serving predictions.
#[derive(Debug, Error)]
pub enum LoanError {
    /// A categorical value outside its fixed dictionary.
    #[error("unknown category `{value}` for field {field}")]
    UnknownCategory { field: &'static str, value: String },

    /// The persisted model is absent or unreadable. Fatal for serving.
    #[error("model not loaded from {}: {reason}", .path.display())]
    ModelNotLoaded { path: PathBuf, reason: String },

    /// A feature vector does not match the schema the model was trained on.
    #[error("encoding mismatch: {detail}")]
    EncodingMismatch { detail: String },

    /// A field value rejected at the input boundary.
    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Wraps an error with the 1-based data row it came from.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: Box<LoanError>,
    },

    /// A required column is absent from a table header.
    #[error("missing column `{0}`")]
    MissingColumn(String),

    /// A cell is empty where a value is required.
    #[error("missing value in column `{column}`")]
    MissingValue { column: String },

    /// A numeric column has no present value to take the median of.
    #[error("column `{column}` has no observed values to compute a median from")]
    NoObservedValues { column: String },

    /// Cleaning was applied to a table that is already cleaned.
    #[error("input table is already cleaned; cleaning runs once on raw records")]
    AlreadyCleaned,

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A feature schema that breaks its invariants.
    #[error("invalid feature schema: {0}")]
    InvalidSchema(String),

    /// Invalid hyperparameter or configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LoanError {
    /// Attach a 1-based row number to an error raised while reading a table.
    pub fn at_row(self, row: usize) -> Self {
        LoanError::InvalidRow {
            row,
            source: Box::new(self),
        }
    }
}

impl From<bincode::Error> for LoanError {
    fn from(err: bincode::Error) -> Self {
        LoanError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LoanError {
    fn from(err: toml::de::Error) -> Self {
        LoanError::Config(err.to_string())
    }
}
