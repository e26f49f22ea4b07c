//! Predict command - scores one application given as flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use loan_approval::preprocessing::encoding::{
    Category, Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use loan_approval::{LoanApplication, LoanConfig, Prediction, Predictor, PredictorConfig};

/// Parses a flag value through a category dictionary.
fn category<C: Category>(raw: &str) -> std::result::Result<C, String> {
    C::parse(raw).map_err(|e| e.to_string())
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Model file (defaults to `paths.model`)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Print the prediction as JSON
    #[arg(long)]
    pub json: bool,

    /// Male or Female
    #[arg(long, value_parser = category::<Gender>)]
    pub gender: Gender,

    /// Yes or No
    #[arg(long, value_parser = category::<Married>)]
    pub married: Married,

    /// 0, 1, 2 or 3+
    #[arg(long, value_parser = category::<Dependents>)]
    pub dependents: Dependents,

    /// Graduate or "Not Graduate"
    #[arg(long, value_parser = category::<Education>)]
    pub education: Education,

    /// Yes or No
    #[arg(long, value_parser = category::<SelfEmployed>)]
    pub self_employed: SelfEmployed,

    #[arg(long)]
    pub applicant_income: f64,

    #[arg(long, default_value_t = 0.0)]
    pub coapplicant_income: f64,

    #[arg(long)]
    pub loan_amount: f64,

    /// Term in months
    #[arg(long, default_value_t = 360.0)]
    pub loan_amount_term: f64,

    /// 1 if the applicant has a credit history, 0 otherwise
    #[arg(long)]
    pub credit_history: f64,

    /// Urban, Semiurban or Rural
    #[arg(long, value_parser = category::<PropertyArea>)]
    pub property_area: PropertyArea,
}

impl PredictArgs {
    fn application(&self) -> LoanApplication {
        LoanApplication {
            gender: self.gender,
            married: self.married,
            dependents: self.dependents,
            education: self.education,
            self_employed: self.self_employed,
            applicant_income: self.applicant_income,
            coapplicant_income: self.coapplicant_income,
            loan_amount: self.loan_amount,
            loan_amount_term: self.loan_amount_term,
            credit_history: self.credit_history,
            property_area: self.property_area,
        }
    }
}

/// Runs the predict command.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or the application is
/// rejected by validation or encoding.
pub fn run(config: &LoanConfig, args: PredictArgs) -> Result<()> {
    let mut predictor_config = PredictorConfig::from(config);
    if let Some(model) = &args.model {
        predictor_config.model_path = model.clone();
    }
    let predictor = Predictor::new(predictor_config).load()?;
    let prediction = predictor
        .predict(&args.application())
        .context("application could not be scored")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        print_prediction(&prediction);
    }
    Ok(())
}

fn print_prediction(prediction: &Prediction) {
    println!(
        "Decision: {} (approval probability {:.1}%)",
        prediction.decision,
        prediction.approval_probability * 100.0
    );
    if !prediction.advisory.is_empty() {
        println!("Possible reasons for concern:");
        for reason in &prediction.advisory {
            println!("  - {reason}");
        }
    }
}
