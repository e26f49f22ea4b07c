//! Cleaning and encoding of loan tables.
//!
//! The same encoding path serves both sides of the model: the
//! [`Preprocessor`] uses it to build the training table, and the predictor
//! uses the fitted [`FittedOneHotEncoder`] stored in the model artifact to
//! encode a single application.
//!
//! # Core Traits
//!
//! - [`Transformer`]: learns parameters (medians, observed categories) from rows
//! - [`FittedTransformer`]: applies them, and exposes them as serializable params
//!
//! # Available Transformers
//!
//! ## Imputation
//! - [`MedianImputer`]: Fill missing base features with the column median
//!
//! ## Encoding
//! - [`OneHotEncoder`]: Indicator columns for `Property_Area` and `Dependents`
//!
//! # Example
//!
//! ```ignore
//! use loan_approval::preprocessing::{Preprocessor, RawTable};
//!
//! let raw = RawTable::read_csv("data/Finance.csv")?;
//! let (cleaned, report) = Preprocessor::new().clean_with_report(&raw)?;
//! cleaned.write_csv("data/cleaned_data.csv")?;
//! ```

pub mod cleaner;
pub mod encoding;
pub mod imputation;
pub mod table;
pub mod traits;

pub use cleaner::{CleaningReport, Preprocessor};
pub use encoding::{
    CodedRecord, EncodedFeatureVector, Feature, FeatureSchema, FittedOneHotEncoder,
    OneHotEncoder, SchemaFingerprint,
};
pub use imputation::{FittedMedianImputer, MedianImputer, MedianImputerParams};
pub use table::{CleanedTable, RawTable};
pub use traits::{FittedTransformer, Transformer};
