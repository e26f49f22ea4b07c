//! Loan approval from raw CSV to a served decision.
//!
//! This example walks the whole pipeline on the bundled sample table:
//! - Clean the raw table (dictionary lookup, median imputation, one-hot)
//! - Train a random forest on the cleaned table and save it
//! - Load the model through a `Predictor` and score two applicants
//!
//! Run with `cargo run --example loan_pipeline`.

use loan_approval::model::ForestParams;
use loan_approval::predictor::Ready;
use loan_approval::preprocessing::encoding::{
    Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use loan_approval::{LoanApplication, Predictor, PredictorConfig, Preprocessor, Trainer};
use std::error::Error;
use std::path::PathBuf;

fn print_application(
    label: &str,
    app: &LoanApplication,
    predictor: &Predictor<Ready>,
) -> Result<(), Box<dyn Error>> {
    let prediction = predictor.predict(app)?;
    println!(
        "{label}: {} (approval probability {:.1}%)",
        prediction.decision,
        prediction.approval_probability * 100.0
    );
    for reason in &prediction.advisory {
        println!("    - {reason}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let raw = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/loans_sample.csv");
    let work = std::env::temp_dir().join("loan_pipeline_example");
    let cleaned = work.join("cleaned_data.csv");
    let model = work.join("model.bin");

    println!("=== Step 1: Clean ===");
    let report = Preprocessor::new().clean_file(&raw, &cleaned)?;
    println!("Rows: {}", report.rows);
    println!("Imputed cells: {}", report.imputed_cells);
    println!("Feature columns: {}", report.schema.column_names().join(", "));
    for (column, median) in &report.medians {
        println!("  median {column:<18} {median}");
    }

    println!("\n=== Step 2: Train ===");
    let trainer = Trainer::builder()
        .forest(ForestParams {
            n_estimators: 50,
            ..ForestParams::default()
        })
        .build()?;
    let trained = trainer.fit_file(&cleaned, &model)?;
    println!(
        "Trained on {} rows, evaluated on {}",
        trained.summary().train_rows,
        trained.summary().test_rows
    );
    println!("Test {}", trained.summary().metrics);

    println!("\n=== Step 3: Predict ===");
    let predictor = Predictor::new(PredictorConfig::new(&model)).load()?;

    let strong = LoanApplication {
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
    };
    let weak = LoanApplication {
        applicant_income: 2000.0,
        loan_amount: 15000.0,
        credit_history: 0.0,
        ..strong.clone()
    };
    print_application("Strong applicant", &strong, &predictor)?;
    print_application("Weak applicant", &weak, &predictor)?;

    Ok(())
}
