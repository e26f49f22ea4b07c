use loan_approval::preprocessing::encoding::{
    Category, Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use loan_approval::LoanApplication;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

const HEADER: &str = "Loan_ID,Gender,Married,Dependents,Education,Self_Employed,\
ApplicantIncome,CoapplicantIncome,LoanAmount,Loan_Amount_Term,Credit_History,\
Property_Area,Loan_Status";

const TERMS: [u32; 6] = [84, 120, 180, 300, 360, 480];

/// Returns `value`, or an empty cell with probability `missing`.
fn cell(rng: &mut StdRng, missing: f64, value: String) -> String {
    if rng.random::<f64>() < missing {
        String::new()
    } else {
        value
    }
}

/// Generate a raw loan CSV with `rows` labelled applicants.
///
/// About 3% of the nullable cells are left empty. Approval follows credit
/// history and the loan-to-income ratio, with some label noise. The same
/// `seed` always yields the same text.
pub fn synthetic_raw_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::with_capacity(rows * 96);
    out.push_str(HEADER);
    out.push('\n');

    for i in 0..rows {
        let app = synthetic_application(&mut rng);
        let ratio = app.loan_amount * 1000.0 / app.combined_income().max(1.0);
        let likely = app.credit_history == 1.0 && ratio < 60.0;
        let approved = likely != (rng.random::<f64>() < 0.1);

        let fields = [
            format!("LP{:06}", i + 1),
            cell(&mut rng, 0.03, app.gender.label().to_string()),
            cell(&mut rng, 0.03, app.married.label().to_string()),
            cell(&mut rng, 0.03, app.dependents.label().to_string()),
            app.education.label().to_string(),
            cell(&mut rng, 0.03, app.self_employed.label().to_string()),
            app.applicant_income.to_string(),
            app.coapplicant_income.to_string(),
            cell(&mut rng, 0.03, app.loan_amount.to_string()),
            cell(&mut rng, 0.03, app.loan_amount_term.to_string()),
            cell(&mut rng, 0.03, app.credit_history.to_string()),
            app.property_area.label().to_string(),
            if approved { "Y" } else { "N" }.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Draw one complete, valid application.
pub fn synthetic_application(rng: &mut StdRng) -> LoanApplication {
    fn pick<C: Category>(rng: &mut StdRng) -> C {
        C::ALL.choose(rng).copied().unwrap_or(C::ALL[0])
    }

    LoanApplication {
        gender: pick::<Gender>(rng),
        married: pick::<Married>(rng),
        dependents: pick::<Dependents>(rng),
        education: pick::<Education>(rng),
        self_employed: pick::<SelfEmployed>(rng),
        applicant_income: rng.random_range(1_000..15_000) as f64,
        coapplicant_income: if rng.random::<bool>() {
            rng.random_range(0..5_000) as f64
        } else {
            0.0
        },
        loan_amount: rng.random_range(40..400) as f64,
        loan_amount_term: TERMS[rng.random_range(0..TERMS.len())] as f64,
        credit_history: if rng.random::<f64>() < 0.8 { 1.0 } else { 0.0 },
        property_area: pick::<PropertyArea>(rng),
    }
}
