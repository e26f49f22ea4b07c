//! Categorical encoding shared by training-data preparation and serving.
//!
//! Encoding happens in two stages, and both the preprocessor and the
//! predictor go through the same functions:
//!
//! 1. [`CodedRecord::from`] maps each categorical cell through its fixed
//!    dictionary (`categorical`), leaving numeric cells untouched.
//! 2. [`FittedOneHotEncoder::transform`] lays the coded record out in the
//!    order of a [`FeatureSchema`], expanding `Property_Area` and `Dependents`
//!    into indicator columns.
//!
//! Between the two, the preprocessor fills gaps with column medians; the
//! predictor never has gaps because a [`LoanApplication`] is complete.
//!
//! [`LoanApplication`]: crate::record::LoanApplication

pub mod categorical;
mod one_hot;
pub mod schema;

pub use categorical::{
    BinaryCategory, Category, Dependents, Education, Gender, LoanStatus, Married, PropertyArea,
    SelfEmployed,
};
pub use one_hot::{FittedOneHotEncoder, OneHotEncoder};
pub use schema::{
    Feature, FeatureSchema, SchemaFingerprint, BASE_FEATURES, ENCODING_VERSION, N_BASE,
};

use crate::record::LoanRecord;

/// A record after dictionary lookup: base features as numeric codes, the
/// multi-valued categories still symbolic. `None` marks a missing cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CodedRecord {
    /// Values for [`BASE_FEATURES`], in that order.
    pub base: [Option<f64>; N_BASE],
    pub property_area: Option<PropertyArea>,
    pub dependents: Option<Dependents>,
}

impl CodedRecord {
    pub fn missing_count(&self) -> usize {
        self.base.iter().filter(|v| v.is_none()).count()
    }
}

impl From<&LoanRecord> for CodedRecord {
    fn from(record: &LoanRecord) -> Self {
        CodedRecord {
            base: [
                record.gender.map(BinaryCategory::code),
                record.married.map(BinaryCategory::code),
                record.education.map(BinaryCategory::code),
                record.self_employed.map(BinaryCategory::code),
                record.applicant_income,
                record.coapplicant_income,
                record.loan_amount,
                record.loan_amount_term,
                record.credit_history,
            ],
            property_area: record.property_area,
            dependents: record.dependents,
        }
    }
}

/// Numeric feature vector in schema order, tagged with the schema it follows.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedFeatureVector {
    values: Vec<f64>,
    fingerprint: SchemaFingerprint,
}

impl EncodedFeatureVector {
    /// Wrap values produced under the schema identified by `fingerprint`.
    pub fn new(values: Vec<f64>, fingerprint: SchemaFingerprint) -> Self {
        Self {
            values,
            fingerprint,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fingerprint(&self) -> &SchemaFingerprint {
        &self.fingerprint
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::graduate_applicant;

    #[test]
    fn test_coded_record_from_application() {
        let record = LoanRecord::from(&graduate_applicant());
        let coded = CodedRecord::from(&record);
        assert_eq!(
            coded.base,
            [
                Some(0.0),
                Some(1.0),
                Some(1.0),
                Some(0.0),
                Some(5000.0),
                Some(0.0),
                Some(150.0),
                Some(360.0),
                Some(1.0)
            ]
        );
        assert_eq!(coded.property_area, Some(PropertyArea::Urban));
        assert_eq!(coded.dependents, Some(Dependents::Zero));
        assert_eq!(coded.missing_count(), 0);
    }

    #[test]
    fn test_coded_record_keeps_gaps() {
        let record = LoanRecord {
            gender: Some(Gender::Female),
            loan_amount: Some(120.0),
            ..LoanRecord::default()
        };
        let coded = CodedRecord::from(&record);
        assert_eq!(coded.base[0], Some(1.0));
        assert_eq!(coded.base[6], Some(120.0));
        assert_eq!(coded.missing_count(), N_BASE - 2);
        assert_eq!(coded.property_area, None);
    }
}
