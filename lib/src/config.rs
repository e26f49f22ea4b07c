//! Project configuration, read from an optional TOML file.
//!
//! Every section and field has a default, so an empty file (or no file) is a
//! valid configuration:
//!
//! ```toml
//! [paths]
//! raw_data = "data/Finance.csv"
//! cleaned_data = "data/cleaned_data.csv"
//! model = "model/model.bin"
//!
//! [preprocessing]
//! id_column = "Loan_ID"
//!
//! [training]
//! test_size = 0.2
//! seed = 42
//!
//! [training.forest]
//! n_estimators = 100
//! max_depth = 5
//! max_features = "sqrt"
//!
//! [advisory]
//! enabled = true
//! min_applicant_income = 2500.0
//! max_loan_to_income = 6.0
//! min_loan_term_months = 120.0
//! ```

use crate::error::{LoanError, Result};
use crate::model::ForestParams;
use crate::predictor::{AdvisoryThresholds, PredictorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    pub paths: PathsConfig,
    pub preprocessing: PreprocessingConfig,
    pub training: TrainingConfig,
    pub advisory: AdvisoryConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_data: PathBuf,
    pub cleaned_data: PathBuf,
    pub model: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/Finance.csv"),
            cleaned_data: PathBuf::from("data/cleaned_data.csv"),
            model: PathBuf::from("model/model.bin"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Identifier column expected in raw tables; dropped like any other extra column.
    pub id_column: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            id_column: "Loan_ID".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub test_size: f64,
    /// Seed of the train/test shuffle.
    pub seed: u64,
    pub forest: ForestParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            forest: ForestParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub thresholds: AdvisoryThresholds,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds: AdvisoryThresholds::default(),
        }
    }
}

impl AdvisoryConfig {
    pub fn thresholds(&self) -> Option<AdvisoryThresholds> {
        self.enabled.then_some(self.thresholds)
    }
}

impl LoanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LoanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoanError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LoanError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        if !(t.test_size > 0.0 && t.test_size < 1.0) {
            return Err(LoanError::Config(format!(
                "training.test_size must be in (0, 1), got {}",
                t.test_size
            )));
        }
        t.forest
            .validate()
            .map_err(|e| LoanError::Config(format!("training.forest: {e}")))?;

        let a = &self.advisory.thresholds;
        for (name, value) in [
            ("min_applicant_income", a.min_applicant_income),
            ("max_loan_to_income", a.max_loan_to_income),
            ("min_loan_term_months", a.min_loan_term_months),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoanError::Config(format!(
                    "advisory.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.preprocessing.id_column.trim().is_empty() {
            return Err(LoanError::Config(
                "preprocessing.id_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&LoanConfig> for PredictorConfig {
    fn from(config: &LoanConfig) -> Self {
        PredictorConfig::new(&config.paths.model).with_advisory(config.advisory.thresholds())
    }
}
