//! Fits a random forest on a cleaned table and evaluates it.

use crate::config::TrainingConfig;
use crate::error::{LoanError, Result};
use crate::metrics::ClassificationMetrics;
use crate::model::{Classifier, ForestParams, RandomForest, TrainedModel, TrainingSummary};
use crate::preprocessing::CleanedTable;
use std::path::Path;
use tracing::info;

/// Splits a cleaned table, fits the forest on the training part and scores
/// it on the held-out part.
///
/// Once built via [`TrainerBuilder`] it is immutable and can be reused.
#[derive(Clone, Debug, PartialEq)]
pub struct Trainer {
    pub(crate) forest: ForestParams,
    pub(crate) test_size: f64,
    pub(crate) seed: u64,
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults:
/// - `forest`: [`ForestParams::default`] (100 trees, depth 5)
/// - `test_size`: 0.2
/// - `seed`: 42
#[derive(Clone, Debug)]
pub struct TrainerBuilder {
    forest: ForestParams,
    test_size: f64,
    seed: u64,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_size: 0.2,
            seed: 42,
        }
    }
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forest(mut self, params: ForestParams) -> Self {
        self.forest = params;
        self
    }

    /// Fraction of rows held out for evaluation.
    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Seed of the train/test shuffle. The forest has its own seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<Trainer> {
        self.forest.validate()?;
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(LoanError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(Trainer {
            forest: self.forest,
            test_size: self.test_size,
            seed: self.seed,
        })
    }
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn from_config(config: &TrainingConfig) -> Result<Self> {
        TrainerBuilder::new()
            .forest(config.forest)
            .test_size(config.test_size)
            .seed(config.seed)
            .build()
    }

    /// Train on `table`, which must be labelled.
    pub fn fit(&self, table: &CleanedTable) -> Result<TrainedModel> {
        let dataset = table.to_dataset()?;
        let (train, test) = dataset.train_test_split(self.test_size, self.seed)?;
        info!(
            train_rows = train.len(),
            test_rows = test.len(),
            features = dataset.n_features(),
            "training random forest"
        );

        let forest = RandomForest::new(self.forest)?.fit(&train)?;

        let predictions = forest.predict_batch(test.features());
        let metrics = ClassificationMetrics::compute(
            &test.labels().to_vec(),
            &predictions.to_vec(),
        )?;
        info!(
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            "evaluated on held-out rows"
        );

        let summary = TrainingSummary {
            train_rows: train.len(),
            test_rows: test.len(),
            metrics,
        };
        TrainedModel::new(table.schema.clone(), forest, summary)
    }

    /// Read a cleaned CSV, train, and write the model to `model_path`.
    pub fn fit_file(
        &self,
        data_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
    ) -> Result<TrainedModel> {
        let table = CleanedTable::read_csv(data_path.as_ref())?;
        let model = self.fit(&table)?;
        model.save(model_path.as_ref())?;
        info!(path = %model_path.as_ref().display(), "model saved");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::tests::full_schema;
    use crate::model::MaxFeatures;
    use crate::preprocessing::encoding::{EncodedFeatureVector, LoanStatus};

    /// Approval follows credit history, except every seventh row.
    fn table(n: usize) -> CleanedTable {
        let schema = full_schema();
        let fp = schema.fingerprint();
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n {
            let credit = (i % 3 != 0) as u8 as f64;
            let mut values = vec![0.0; schema.len()];
            values[4] = 2000.0 + (i * 113 % 5000) as f64;
            values[6] = 60.0 + (i * 17 % 300) as f64;
            values[7] = 360.0;
            values[8] = credit;
            values[9 + i % 3] = 1.0;
            values[12 + i % 4] = 1.0;
            rows.push(EncodedFeatureVector::new(values, fp.clone()));
            let approved = (credit == 1.0) != (i % 7 == 0);
            labels.push(if approved {
                LoanStatus::Approved
            } else {
                LoanStatus::Rejected
            });
        }
        CleanedTable {
            schema,
            rows,
            labels: Some(labels),
        }
    }

    fn quick() -> Trainer {
        Trainer::builder()
            .forest(ForestParams {
                n_estimators: 20,
                max_features: MaxFeatures::All,
                ..ForestParams::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let trainer = Trainer::builder().build().unwrap();
        assert_eq!(trainer.test_size, 0.2);
        assert_eq!(trainer.seed, 42);
        assert_eq!(trainer.forest, ForestParams::default());
    }

    #[test]
    fn test_builder_rejects_bad_forest() {
        let result = Trainer::builder()
            .forest(ForestParams {
                n_estimators: 0,
                ..ForestParams::default()
            })
            .build();
        assert!(matches!(result, Err(LoanError::InvalidParameter(_))));

        let result = Trainer::builder().test_size(1.0).build();
        assert!(matches!(result, Err(LoanError::InvalidParameter(_))));
    }

    #[test]
    fn test_fit_reports_split_and_metrics() {
        let model = quick().fit(&table(100)).unwrap();
        let summary = model.summary();
        assert_eq!(summary.test_rows, 20);
        assert_eq!(summary.train_rows, 80);
        assert_eq!(summary.metrics.confusion.total(), 20);
        assert!(summary.metrics.accuracy > 0.6);
        assert_eq!(model.schema(), &full_schema());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = table(60);
        let a = quick().fit(&data).unwrap();
        let b = quick().fit(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unlabelled_table_cannot_train() {
        let mut data = table(20);
        data.labels = None;
        assert!(matches!(
            quick().fit(&data),
            Err(LoanError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_fit_file_writes_model() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("cleaned.csv");
        let model_path = dir.path().join("out").join("model.bin");
        table(50).write_csv(&data_path).unwrap();

        let model = quick().fit_file(&data_path, &model_path).unwrap();
        assert_eq!(TrainedModel::load(&model_path).unwrap(), model);
    }
}
