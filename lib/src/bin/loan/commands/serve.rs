//! Serve command - answers one JSON application per stdin line.
//!
//! Each input line is a JSON object with the raw column names
//! (`{"Gender": "Male", "ApplicantIncome": 5000, ...}`). Each output line is
//! either a prediction or `{"error": "..."}`. A bad line never stops the loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use loan_approval::predictor::Ready;
use loan_approval::{LoanApplication, LoanConfig, Prediction, Predictor, PredictorConfig};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
#[serde(untagged)]
enum Response {
    Prediction(Prediction),
    Error { error: String },
}

/// Counts of answered lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub answered: usize,
    pub failed: usize,
}

fn respond(predictor: &Predictor<Ready>, line: &str) -> Response {
    let application: LoanApplication = match serde_json::from_str(line) {
        Ok(app) => app,
        Err(e) => {
            return Response::Error {
                error: format!("invalid request: {e}"),
            }
        }
    };
    match predictor.predict(&application) {
        Ok(prediction) => Response::Prediction(prediction),
        Err(e) => Response::Error {
            error: e.to_string(),
        },
    }
}

/// Answers every non-blank line of `input` on `output`.
///
/// # Errors
///
/// Returns an error only if reading `input` or writing `output` fails.
pub fn serve_lines<R: BufRead, W: Write>(
    predictor: &Predictor<Ready>,
    input: R,
    mut output: W,
) -> Result<ServeStats> {
    let mut stats = ServeStats::default();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = respond(predictor, &line);
        match &response {
            Response::Prediction(_) => stats.answered += 1,
            Response::Error { error } => {
                warn!(line = i + 1, %error, "request failed");
                stats.failed += 1;
            }
        }
        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
    }
    Ok(stats)
}

/// Runs the serve command until stdin closes.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or stdio fails.
pub fn run(config: &LoanConfig, model: Option<PathBuf>) -> Result<()> {
    let mut predictor_config = PredictorConfig::from(config);
    if let Some(model) = model {
        predictor_config.model_path = model;
    }
    let predictor = Predictor::new(predictor_config).load()?;
    info!("serving predictions on stdin");

    let stats = serve_lines(&predictor, io::stdin().lock(), io::stdout().lock())?;
    info!(
        answered = stats.answered,
        failed = stats.failed,
        "input closed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_approval::model::{ForestParams, MaxFeatures};
    use loan_approval::{Preprocessor, RawTable, Trainer};

    fn predictor() -> Predictor<Ready> {
        let mut csv = String::from(
            "Loan_ID,Gender,Married,Dependents,Education,Self_Employed,ApplicantIncome,\
             CoapplicantIncome,LoanAmount,Loan_Amount_Term,Credit_History,Property_Area,Loan_Status\n",
        );
        for i in 0..20 {
            let credit = i % 2;
            let status = if credit == 1 { "Y" } else { "N" };
            let area = ["Urban", "Rural", "Semiurban"][i % 3];
            csv.push_str(&format!(
                "LP{i},Male,Yes,0,Graduate,No,{},0,{},360,{credit},{area},{status}\n",
                3000 + i * 100,
                100 + i
            ));
        }
        let raw = RawTable::from_reader(csv.as_bytes()).unwrap();
        let cleaned = Preprocessor::new().clean(&raw).unwrap();
        let model = Trainer::builder()
            .forest(ForestParams {
                n_estimators: 5,
                max_features: MaxFeatures::All,
                ..ForestParams::default()
            })
            .build()
            .unwrap()
            .fit(&cleaned)
            .unwrap();
        Predictor::from_model(model, None)
    }

    #[test]
    fn test_bad_lines_do_not_stop_the_loop() {
        let input = "\
{\"Gender\":\"Male\",\"Married\":\"Yes\",\"Dependents\":\"0\",\"Education\":\"Graduate\",\"Self_Employed\":\"No\",\"ApplicantIncome\":5000,\"CoapplicantIncome\":0,\"LoanAmount\":120,\"Loan_Amount_Term\":360,\"Credit_History\":1,\"Property_Area\":\"Urban\"}

not json
{\"Gender\":\"Male\",\"Married\":\"Yes\",\"Dependents\":\"0\",\"Education\":\"Graduate\",\"Self_Employed\":\"No\",\"ApplicantIncome\":5000,\"CoapplicantIncome\":0,\"LoanAmount\":-1,\"Loan_Amount_Term\":360,\"Credit_History\":1,\"Property_Area\":\"Urban\"}
";
        let mut output = Vec::new();
        let stats = serve_lines(&predictor(), input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats, ServeStats { answered: 1, failed: 2 });

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["decision"], "approved");
        assert!(lines[1]["error"].as_str().unwrap().starts_with("invalid request"));
        assert!(lines[2]["error"].is_string());
    }
}
