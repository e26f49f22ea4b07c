//! End-to-end runs over the bundled sample table.

use std::path::PathBuf;

use loan_approval::model::{ForestParams, MaxFeatures};
use loan_approval::predictor::RejectionReason;
use loan_approval::preprocessing::encoding::{
    Category, Dependents, Education, Feature, FeatureSchema, FittedOneHotEncoder, Gender, Married,
    PropertyArea, SelfEmployed,
};
use loan_approval::{
    CleanedTable, Decision, LoanApplication, LoanError, Predictor, PredictorConfig, Preprocessor,
    RawTable, TrainedModel, Trainer,
};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/loans_sample.csv")
}

fn small_trainer() -> Trainer {
    Trainer::builder()
        .forest(ForestParams {
            n_estimators: 20,
            max_features: MaxFeatures::All,
            ..ForestParams::default()
        })
        .seed(7)
        .build()
        .unwrap()
}

fn applicant() -> LoanApplication {
    LoanApplication {
        gender: Gender::Male,
        married: Married::Yes,
        dependents: Dependents::Zero,
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        applicant_income: 5000.0,
        coapplicant_income: 0.0,
        loan_amount: 150.0,
        loan_amount_term: 360.0,
        credit_history: 1.0,
        property_area: PropertyArea::Urban,
    }
}

#[test]
fn test_clean_train_save_load_predict() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned_path = dir.path().join("cleaned.csv");
    let model_path = dir.path().join("model").join("model.bin");

    let report = Preprocessor::new()
        .clean_file(sample_path(), &cleaned_path)
        .unwrap();
    assert_eq!(report.rows, 48);
    assert!(report.imputed_cells > 0);
    assert_eq!(report.dropped_columns, vec!["Loan_ID".to_string()]);

    let trained = small_trainer().fit_file(&cleaned_path, &model_path).unwrap();
    assert_eq!(trained.summary().test_rows, 10);
    assert_eq!(trained.summary().train_rows, 38);

    let predictor = Predictor::new(PredictorConfig::new(&model_path))
        .load()
        .unwrap();
    assert_eq!(predictor.model(), &trained);

    let prediction = predictor.predict(&applicant()).unwrap();
    assert!((0.0..=1.0).contains(&prediction.approval_probability));
    assert_eq!(
        prediction.decision,
        Decision::from_probability(prediction.approval_probability)
    );
    assert!(prediction.advisory.is_empty());

    let encoded = predictor.model().encode(&applicant()).unwrap();
    let reloaded = TrainedModel::load(&model_path).unwrap();
    assert_eq!(
        reloaded.predict_proba(&encoded).unwrap(),
        prediction.approval_probability
    );
}

#[test]
fn test_cleaning_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.csv");
    let second = dir.path().join("b.csv");
    Preprocessor::new().clean_file(sample_path(), &first).unwrap();
    Preprocessor::new().clean_file(sample_path(), &second).unwrap();
    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_cleaned_output_is_rejected_as_input() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = dir.path().join("cleaned.csv");
    Preprocessor::new().clean_file(sample_path(), &cleaned).unwrap();

    let err = Preprocessor::new()
        .clean_file(&cleaned, dir.path().join("twice.csv"))
        .unwrap_err();
    assert!(matches!(err, LoanError::AlreadyCleaned));
    assert!(!dir.path().join("twice.csv").exists());
}

#[test]
fn test_training_is_reproducible() {
    let raw = RawTable::read_csv(sample_path()).unwrap();
    let cleaned = Preprocessor::new().clean(&raw).unwrap();
    let a = small_trainer().fit(&cleaned).unwrap();
    let b = small_trainer().fit(&cleaned).unwrap();
    assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}

#[test]
fn test_cleaned_table_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned.csv");
    let report = Preprocessor::new().clean_file(sample_path(), &path).unwrap();

    let table = CleanedTable::read_csv(&path).unwrap();
    assert_eq!(table.schema, report.schema);
    assert_eq!(table.len(), 48);
    assert!(table
        .rows
        .iter()
        .all(|r| r.values().iter().all(|v| v.is_finite())));
    assert_eq!(table.to_dataset().unwrap().n_features(), report.schema.len());
}

#[test]
fn test_application_encodes_like_the_training_rows() {
    let schema = FeatureSchema::from_observed(
        &PropertyArea::ALL.iter().copied().collect(),
        &Dependents::ALL.iter().copied().collect(),
    );
    let encoder = FittedOneHotEncoder::new(schema.clone());
    let vector = encoder.encode_application(&applicant()).unwrap();
    let value = |f: Feature| vector.values()[schema.position(f).unwrap()];

    assert_eq!(value(Feature::Gender), 0.0);
    assert_eq!(value(Feature::Married), 1.0);
    assert_eq!(value(Feature::Education), 1.0);
    assert_eq!(value(Feature::SelfEmployed), 0.0);
    assert_eq!(value(Feature::PropertyArea(PropertyArea::Urban)), 1.0);
    assert_eq!(value(Feature::PropertyArea(PropertyArea::Rural)), 0.0);
    assert_eq!(value(Feature::PropertyArea(PropertyArea::Semiurban)), 0.0);
    assert_eq!(value(Feature::Dependents(Dependents::Zero)), 1.0);
    for count in [Dependents::One, Dependents::Two, Dependents::ThreePlus] {
        assert_eq!(value(Feature::Dependents(count)), 0.0);
    }
}

#[test]
fn test_weak_application_gets_advisory_reasons() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = dir.path().join("cleaned.csv");
    let model = dir.path().join("model.bin");
    Preprocessor::new().clean_file(sample_path(), &cleaned).unwrap();
    small_trainer().fit_file(&cleaned, &model).unwrap();

    let predictor = Predictor::new(PredictorConfig::new(&model)).load().unwrap();
    let weak = LoanApplication {
        applicant_income: 2000.0,
        coapplicant_income: 0.0,
        loan_amount: 13000.0,
        credit_history: 0.0,
        ..applicant()
    };
    let prediction = predictor.predict(&weak).unwrap();
    assert!(prediction
        .advisory
        .contains(&RejectionReason::LowApplicantIncome));
    assert!(prediction
        .advisory
        .contains(&RejectionReason::NoCreditHistory));
}

#[test]
fn test_missing_model_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let result = Predictor::new(PredictorConfig::new(dir.path().join("nothing.bin"))).load();
    assert!(matches!(result, Err(LoanError::ModelNotLoaded { .. })));
}
