//! Loan records: raw training rows and complete applications.

use crate::error::{LoanError, Result};
use crate::preprocessing::encoding::categorical::{
    Category, Dependents, Education, Gender, LoanStatus, Married, PropertyArea, SelfEmployed,
};
use crate::preprocessing::encoding::schema::columns;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `Loan_Amount_Term`, in months.
pub const MAX_LOAN_TERM_MONTHS: f64 = 600.0;

/// One applicant as read from a raw table. Empty cells are `None`.
///
/// Categorical cells that are present have already been checked against
/// their dictionaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoanRecord {
    pub gender: Option<Gender>,
    pub married: Option<Married>,
    pub dependents: Option<Dependents>,
    pub education: Option<Education>,
    pub self_employed: Option<SelfEmployed>,
    pub applicant_income: Option<f64>,
    pub coapplicant_income: Option<f64>,
    pub loan_amount: Option<f64>,
    pub loan_amount_term: Option<f64>,
    pub credit_history: Option<f64>,
    pub property_area: Option<PropertyArea>,
    /// Present only in training data.
    pub loan_status: Option<LoanStatus>,
}

/// A raw CSV row before dictionary lookup. Unknown columns are ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Married", default)]
    married: Option<String>,
    #[serde(rename = "Dependents", default)]
    dependents: Option<String>,
    #[serde(rename = "Education", default)]
    education: Option<String>,
    #[serde(rename = "Self_Employed", default)]
    self_employed: Option<String>,
    #[serde(rename = "ApplicantIncome", default)]
    applicant_income: Option<String>,
    #[serde(rename = "CoapplicantIncome", default)]
    coapplicant_income: Option<String>,
    #[serde(rename = "LoanAmount", default)]
    loan_amount: Option<String>,
    #[serde(rename = "Loan_Amount_Term", default)]
    loan_amount_term: Option<String>,
    #[serde(rename = "Credit_History", default)]
    credit_history: Option<String>,
    #[serde(rename = "Property_Area", default)]
    property_area: Option<String>,
    #[serde(rename = "Loan_Status", default)]
    loan_status: Option<String>,
}

fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

fn parse_category<C: Category>(cell: Option<String>) -> Result<Option<C>> {
    present(cell).map(|s| C::parse(&s)).transpose()
}

fn parse_number(field: &'static str, cell: Option<String>) -> Result<Option<f64>> {
    let Some(raw) = present(cell) else {
        return Ok(None);
    };
    let value: f64 = raw.trim().parse().map_err(|_| LoanError::InvalidInput {
        field,
        reason: format!("`{}` is not a number", raw.trim()),
    })?;
    if value.is_nan() {
        return Ok(None);
    }
    if !value.is_finite() {
        return Err(LoanError::InvalidInput {
            field,
            reason: "value must be finite".to_string(),
        });
    }
    Ok(Some(value))
}

impl RawRow {
    pub(crate) fn into_record(self) -> Result<LoanRecord> {
        Ok(LoanRecord {
            gender: parse_category(self.gender)?,
            married: parse_category(self.married)?,
            dependents: parse_category(self.dependents)?,
            education: parse_category(self.education)?,
            self_employed: parse_category(self.self_employed)?,
            applicant_income: parse_number(columns::APPLICANT_INCOME, self.applicant_income)?,
            coapplicant_income: parse_number(
                columns::COAPPLICANT_INCOME,
                self.coapplicant_income,
            )?,
            loan_amount: parse_number(columns::LOAN_AMOUNT, self.loan_amount)?,
            loan_amount_term: parse_number(columns::LOAN_AMOUNT_TERM, self.loan_amount_term)?,
            credit_history: parse_number(columns::CREDIT_HISTORY, self.credit_history)?,
            property_area: parse_category(self.property_area)?,
            loan_status: parse_category(self.loan_status)?,
        })
    }
}

/// A complete, unlabelled application as submitted for a decision.
///
/// Serialized with the raw column names and category labels, so a JSON
/// request reads like a row of the training file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Married")]
    pub married: Married,
    #[serde(rename = "Dependents")]
    pub dependents: Dependents,
    #[serde(rename = "Education")]
    pub education: Education,
    #[serde(rename = "Self_Employed")]
    pub self_employed: SelfEmployed,
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: f64,
    #[serde(rename = "CoapplicantIncome")]
    pub coapplicant_income: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: f64,
    #[serde(rename = "Credit_History")]
    pub credit_history: f64,
    #[serde(rename = "Property_Area")]
    pub property_area: PropertyArea,
}

fn invalid(field: &'static str, reason: &str) -> LoanError {
    LoanError::InvalidInput {
        field,
        reason: reason.to_string(),
    }
}

impl LoanApplication {
    /// Reject out-of-range numeric values before they reach the encoder.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            (columns::APPLICANT_INCOME, self.applicant_income),
            (columns::COAPPLICANT_INCOME, self.coapplicant_income),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a finite, non-negative amount"));
            }
        }
        if !self.loan_amount.is_finite() || self.loan_amount <= 0.0 {
            return Err(invalid(columns::LOAN_AMOUNT, "must be a finite, positive amount"));
        }
        if !self.loan_amount_term.is_finite()
            || self.loan_amount_term <= 0.0
            || self.loan_amount_term > MAX_LOAN_TERM_MONTHS
        {
            return Err(LoanError::InvalidInput {
                field: columns::LOAN_AMOUNT_TERM,
                reason: format!("must be between 0 and {MAX_LOAN_TERM_MONTHS} months"),
            });
        }
        if self.credit_history != 0.0 && self.credit_history != 1.0 {
            return Err(invalid(columns::CREDIT_HISTORY, "must be 0 or 1"));
        }
        Ok(())
    }

    pub fn combined_income(&self) -> f64 {
        self.applicant_income + self.coapplicant_income
    }
}

impl From<&LoanApplication> for LoanRecord {
    fn from(app: &LoanApplication) -> Self {
        LoanRecord {
            gender: Some(app.gender),
            married: Some(app.married),
            dependents: Some(app.dependents),
            education: Some(app.education),
            self_employed: Some(app.self_employed),
            applicant_income: Some(app.applicant_income),
            coapplicant_income: Some(app.coapplicant_income),
            loan_amount: Some(app.loan_amount),
            loan_amount_term: Some(app.loan_amount_term),
            credit_history: Some(app.credit_history),
            property_area: Some(app.property_area),
            loan_status: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The applicant used across the crate's tests.
    pub(crate) fn graduate_applicant() -> LoanApplication {
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

    fn raw(cells: &[(&str, &str)]) -> RawRow {
        let mut row = RawRow::default();
        for (column, value) in cells {
            let value = Some(value.to_string());
            match *column {
                "Gender" => row.gender = value,
                "Married" => row.married = value,
                "Dependents" => row.dependents = value,
                "ApplicantIncome" => row.applicant_income = value,
                "LoanAmount" => row.loan_amount = value,
                "Loan_Status" => row.loan_status = value,
                other => panic!("column {other} not used in tests"),
            }
        }
        row
    }

    #[test]
    fn test_raw_row_maps_categories_and_numbers() {
        let record = raw(&[
            ("Gender", "Female"),
            ("Dependents", "3+"),
            ("ApplicantIncome", " 4583 "),
            ("Loan_Status", "N"),
        ])
        .into_record()
        .unwrap();
        assert_eq!(record.gender, Some(Gender::Female));
        assert_eq!(record.dependents, Some(Dependents::ThreePlus));
        assert_eq!(record.applicant_income, Some(4583.0));
        assert_eq!(record.loan_status, Some(LoanStatus::Rejected));
        assert_eq!(record.loan_amount, None);
    }

    #[test]
    fn test_raw_row_blank_cells_are_missing() {
        let record = raw(&[("Married", "  "), ("LoanAmount", "")])
            .into_record()
            .unwrap();
        assert_eq!(record.married, None);
        assert_eq!(record.loan_amount, None);
    }

    #[test]
    fn test_raw_row_rejects_unmapped_category() {
        let err = raw(&[("Married", "Maybe")]).into_record().unwrap_err();
        assert!(matches!(err, LoanError::UnknownCategory { field: "Married", .. }));
    }

    #[test]
    fn test_raw_row_rejects_non_numeric() {
        let err = raw(&[("LoanAmount", "lots")]).into_record().unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { field: "LoanAmount", .. }));
    }

    #[test]
    fn test_application_validate_accepts_typical_input() {
        assert!(graduate_applicant().validate().is_ok());
    }

    #[test]
    fn test_application_validate_rejects_out_of_range() {
        let mut app = graduate_applicant();
        app.applicant_income = -1.0;
        assert!(matches!(
            app.validate(),
            Err(LoanError::InvalidInput { field: "ApplicantIncome", .. })
        ));

        let mut app = graduate_applicant();
        app.loan_amount = 0.0;
        assert!(app.validate().is_err());

        let mut app = graduate_applicant();
        app.loan_amount_term = 720.0;
        assert!(app.validate().is_err());

        let mut app = graduate_applicant();
        app.credit_history = 0.5;
        assert!(matches!(
            app.validate(),
            Err(LoanError::InvalidInput { field: "Credit_History", .. })
        ));

        let mut app = graduate_applicant();
        app.coapplicant_income = f64::INFINITY;
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_application_json_uses_raw_column_names() {
        let json = r#"{
            "Gender": "Male", "Married": "Yes", "Dependents": "0",
            "Education": "Graduate", "Self_Employed": "No",
            "ApplicantIncome": 5000, "CoapplicantIncome": 0,
            "LoanAmount": 150, "Loan_Amount_Term": 360,
            "Credit_History": 1, "Property_Area": "Urban"
        }"#;
        let app: LoanApplication = serde_json::from_str(json).unwrap();
        assert_eq!(app, graduate_applicant());
    }

    #[test]
    fn test_record_from_application_has_no_label() {
        let record = LoanRecord::from(&graduate_applicant());
        assert_eq!(record.loan_status, None);
        assert_eq!(record.property_area, Some(PropertyArea::Urban));
    }
}
