//! Rule-based rejection reasons shown next to a decision.
//!
//! These rules never influence the model's output; they explain common
//! reasons an application looks weak.

use crate::record::LoanApplication;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cut-offs for the advisory rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryThresholds {
    /// Applicant income below this is flagged.
    pub min_applicant_income: f64,
    /// `LoanAmount / (ApplicantIncome + CoapplicantIncome)` above this is flagged.
    pub max_loan_to_income: f64,
    /// Terms shorter than this many months are flagged.
    pub min_loan_term_months: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            min_applicant_income: 2500.0,
            max_loan_to_income: 6.0,
            min_loan_term_months: 120.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    LowApplicantIncome,
    HighLoanToIncome,
    NoCreditHistory,
    ShortLoanTerm,
}

impl RejectionReason {
    pub fn message(self) -> &'static str {
        match self {
            RejectionReason::LowApplicantIncome => "low applicant income",
            RejectionReason::HighLoanToIncome => "loan amount is high relative to income",
            RejectionReason::NoCreditHistory => "no credit history",
            RejectionReason::ShortLoanTerm => "short loan term",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Every rule `app` trips, in a fixed order.
pub fn assess(app: &LoanApplication, thresholds: &AdvisoryThresholds) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();
    if app.applicant_income < thresholds.min_applicant_income {
        reasons.push(RejectionReason::LowApplicantIncome);
    }
    let income = app.combined_income();
    if income <= 0.0 || app.loan_amount / income > thresholds.max_loan_to_income {
        reasons.push(RejectionReason::HighLoanToIncome);
    }
    if app.credit_history == 0.0 {
        reasons.push(RejectionReason::NoCreditHistory);
    }
    if app.loan_amount_term < thresholds.min_loan_term_months {
        reasons.push(RejectionReason::ShortLoanTerm);
    }
    reasons
}
