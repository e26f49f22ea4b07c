//! The persisted model: forest, feature schema and training summary.
//!
//! The file is the bincode encoding of [`TrainedModelParams`]. It opens with
//! a format tag and version so an unrelated or outdated file is refused
//! instead of being misread.

use crate::error::{LoanError, Result};
use crate::metrics::ClassificationMetrics;
use crate::model::forest::{ForestModelParams, RandomForest};
use crate::model::state::Fitted;
use crate::model::Classifier;
use crate::preprocessing::encoding::{EncodedFeatureVector, FeatureSchema, FittedOneHotEncoder};
use crate::record::LoanApplication;
use crate::serialization::SerializableParams;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tag written at the start of every model file.
pub const MODEL_FORMAT: &str = "loan-approval/model";

/// Layout version of [`TrainedModelParams`].
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// What a training run produced, kept alongside the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    /// Evaluation on the held-out rows.
    pub metrics: ClassificationMetrics,
}

/// Plain-data form of a [`TrainedModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelParams {
    pub format: String,
    pub version: u32,
    pub schema: FeatureSchema,
    pub forest: ForestModelParams,
    pub summary: TrainingSummary,
}

/// A fitted forest bound to the schema its inputs must follow.
///
/// Immutable once built; share it across threads behind an `Arc` or a
/// plain reference.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainedModel {
    encoder: FittedOneHotEncoder,
    forest: RandomForest<Fitted>,
    summary: TrainingSummary,
}

impl TrainedModel {
    pub fn new(
        schema: FeatureSchema,
        forest: RandomForest<Fitted>,
        summary: TrainingSummary,
    ) -> Result<Self> {
        schema.validate()?;
        if forest.n_features() != schema.len() {
            return Err(LoanError::EncodingMismatch {
                detail: format!(
                    "forest expects {} features but the schema has {}",
                    forest.n_features(),
                    schema.len()
                ),
            });
        }
        Ok(Self {
            encoder: FittedOneHotEncoder::new(schema),
            forest,
            summary,
        })
    }

    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    pub fn forest(&self) -> &RandomForest<Fitted> {
        &self.forest
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Encode an application under this model's schema.
    pub fn encode(&self, app: &LoanApplication) -> Result<EncodedFeatureVector> {
        self.encoder.encode_application(app)
    }

    /// Approval probability for a vector built under this model's schema.
    pub fn predict_proba(&self, vector: &EncodedFeatureVector) -> Result<f64> {
        self.encoder.check(vector)?;
        Ok(self
            .forest
            .predict_proba(ArrayView1::from(vector.values())))
    }

    pub fn to_params(&self) -> TrainedModelParams {
        TrainedModelParams {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_FORMAT_VERSION,
            schema: self.schema().clone(),
            forest: self.forest.extract_params(),
            summary: self.summary.clone(),
        }
    }

    pub fn from_params(params: TrainedModelParams) -> Result<Self> {
        if params.format != MODEL_FORMAT {
            return Err(LoanError::Serialization(format!(
                "not a loan-approval model (format tag `{}`)",
                params.format
            )));
        }
        if params.version != MODEL_FORMAT_VERSION {
            return Err(LoanError::Serialization(format!(
                "model format version {} is not supported (expected {})",
                params.version, MODEL_FORMAT_VERSION
            )));
        }
        let forest = RandomForest::from_params(params.forest)?;
        Self::new(params.schema, forest, params.summary)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_params().to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_params(TrainedModelParams::from_bytes(bytes)?)
    }

    /// Write the model to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_params().write_file(path.as_ref())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_params(TrainedModelParams::read_file(path.as_ref())?)
    }
}
