//! Serving decisions from a persisted model.
//!
//! A [`Predictor`] starts [`Uninitialized`], holding only its configuration.
//! [`Predictor::load`] reads the model file once and yields a
//! `Predictor<Ready>`; only that state can predict. A missing or corrupt
//! model therefore fails at start-up, never on a request.
//!
//! # Example
//!
//! ```ignore
//! use loan_approval::predictor::{Predictor, PredictorConfig};
//!
//! let predictor = Predictor::new(PredictorConfig::new("model/model.bin")).load()?;
//! let prediction = predictor.predict(&application)?;
//! println!("{} ({:.0}%)", prediction.decision, prediction.approval_probability * 100.0);
//! ```

pub mod advisory;

pub use advisory::{assess, AdvisoryThresholds, RejectionReason};

use crate::error::{LoanError, Result};
use crate::model::{TrainedModel, DECISION_THRESHOLD};
use crate::preprocessing::encoding::EncodedFeatureVector;
use crate::record::LoanApplication;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the model lives and which advisory rules to apply.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictorConfig {
    pub model_path: PathBuf,
    /// `None` disables advisory reasons.
    pub advisory: Option<AdvisoryThresholds>,
}

impl PredictorConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            advisory: Some(AdvisoryThresholds::default()),
        }
    }

    pub fn with_advisory(mut self, advisory: Option<AdvisoryThresholds>) -> Self {
        self.advisory = advisory;
        self
    }
}

/// State of a predictor whose model has not been loaded.
#[derive(Clone, Debug)]
pub struct Uninitialized {
    config: PredictorConfig,
}

/// State of a predictor holding a loaded model.
#[derive(Clone, Debug)]
pub struct Ready {
    model: TrainedModel,
    advisory: Option<AdvisoryThresholds>,
}

#[derive(Clone, Debug)]
pub struct Predictor<S> {
    state: S,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Decision::Approved
        } else {
            Decision::Rejected
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        })
    }
}

/// A decision plus the advisory reasons that apply to the application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub decision: Decision,
    /// Mean approval probability over the forest's trees.
    pub approval_probability: f64,
    pub advisory: Vec<RejectionReason>,
}

impl Predictor<Uninitialized> {
    pub fn new(config: PredictorConfig) -> Self {
        Self {
            state: Uninitialized { config },
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.state.config
    }

    /// Load the model. Any failure is reported as [`LoanError::ModelNotLoaded`].
    pub fn load(self) -> Result<Predictor<Ready>> {
        let Uninitialized { config } = self.state;
        let model =
            TrainedModel::load(&config.model_path).map_err(|e| LoanError::ModelNotLoaded {
                path: config.model_path.clone(),
                reason: e.to_string(),
            })?;
        info!(
            path = %config.model_path.display(),
            schema = %model.encoder().fingerprint(),
            trees = model.forest().trees().len(),
            "model loaded"
        );
        Ok(Predictor::from_model(model, config.advisory))
    }
}

impl Predictor<Ready> {
    /// Wrap a model that is already in memory.
    pub fn from_model(model: TrainedModel, advisory: Option<AdvisoryThresholds>) -> Self {
        Self {
            state: Ready { model, advisory },
        }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.state.model
    }

    /// Validate, encode and score one application.
    pub fn predict(&self, app: &LoanApplication) -> Result<Prediction> {
        app.validate()?;
        let vector = self.state.model.encode(app)?;
        let mut prediction = self.predict_encoded(&vector)?;
        if let Some(thresholds) = &self.state.advisory {
            prediction.advisory = assess(app, thresholds);
        }
        debug!(
            decision = %prediction.decision,
            probability = prediction.approval_probability,
            reasons = prediction.advisory.len(),
            "prediction"
        );
        Ok(prediction)
    }

    /// Score a caller-built vector. It must carry this model's schema
    /// fingerprint and length. No advisory reasons are attached.
    pub fn predict_encoded(&self, vector: &EncodedFeatureVector) -> Result<Prediction> {
        let probability = self.state.model.predict_proba(vector)?;
        Ok(Prediction {
            decision: Decision::from_probability(probability),
            approval_probability: probability,
            advisory: Vec::new(),
        })
    }
}
