//! Explicit, versioned feature order.
//!
//! The schema is the ordered list of final feature columns a model consumes.
//! It is computed once when the training table is cleaned, persisted inside
//! the model artifact, and reused verbatim at inference time, so the column
//! order never depends on how an expansion happened to enumerate categories.

use crate::error::{LoanError, Result};
use crate::preprocessing::encoding::categorical::{Category, Dependents, PropertyArea};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Version of the encoding rules (dictionaries, imputation, expansion).
///
/// Bump whenever a rule changes; models built under another version are refused.
pub const ENCODING_VERSION: u32 = 1;

/// Raw column names that are not categorical dictionaries.
pub mod columns {
    pub const APPLICANT_INCOME: &str = "ApplicantIncome";
    pub const COAPPLICANT_INCOME: &str = "CoapplicantIncome";
    pub const LOAN_AMOUNT: &str = "LoanAmount";
    pub const LOAN_AMOUNT_TERM: &str = "Loan_Amount_Term";
    pub const CREDIT_HISTORY: &str = "Credit_History";
}

/// One column of the encoded feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Gender,
    Married,
    Education,
    SelfEmployed,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanAmountTerm,
    CreditHistory,
    /// Indicator for one property area.
    PropertyArea(PropertyArea),
    /// Indicator for one dependents count.
    Dependents(Dependents),
}

/// Number of features encoded in place (binary codes and numerics).
pub const N_BASE: usize = 9;

/// In-place features, in their canonical order.
pub const BASE_FEATURES: [Feature; N_BASE] = [
    Feature::Gender,
    Feature::Married,
    Feature::Education,
    Feature::SelfEmployed,
    Feature::ApplicantIncome,
    Feature::CoapplicantIncome,
    Feature::LoanAmount,
    Feature::LoanAmountTerm,
    Feature::CreditHistory,
];

impl Feature {
    /// Column name in the cleaned table, e.g. `Property_Area_Urban`.
    pub fn column_name(&self) -> Cow<'static, str> {
        use crate::preprocessing::encoding::categorical::{
            Education, Gender, Married, SelfEmployed,
        };
        match self {
            Feature::Gender => Cow::Borrowed(Gender::FIELD),
            Feature::Married => Cow::Borrowed(Married::FIELD),
            Feature::Education => Cow::Borrowed(Education::FIELD),
            Feature::SelfEmployed => Cow::Borrowed(SelfEmployed::FIELD),
            Feature::ApplicantIncome => Cow::Borrowed(columns::APPLICANT_INCOME),
            Feature::CoapplicantIncome => Cow::Borrowed(columns::COAPPLICANT_INCOME),
            Feature::LoanAmount => Cow::Borrowed(columns::LOAN_AMOUNT),
            Feature::LoanAmountTerm => Cow::Borrowed(columns::LOAN_AMOUNT_TERM),
            Feature::CreditHistory => Cow::Borrowed(columns::CREDIT_HISTORY),
            Feature::PropertyArea(area) => indicator_name(*area),
            Feature::Dependents(count) => indicator_name(*count),
        }
    }

    /// Parse a cleaned-table column name back into a feature.
    pub fn from_column_name(name: &str) -> Option<Feature> {
        if let Some(base) = BASE_FEATURES.iter().find(|f| f.column_name() == name) {
            return Some(*base);
        }
        indicator_value::<PropertyArea>(name)
            .map(Feature::PropertyArea)
            .or_else(|| indicator_value::<Dependents>(name).map(Feature::Dependents))
    }

    /// Position in [`BASE_FEATURES`], or `None` for indicator columns.
    pub fn base_index(&self) -> Option<usize> {
        BASE_FEATURES.iter().position(|f| f == self)
    }

    pub fn is_indicator(&self) -> bool {
        matches!(self, Feature::PropertyArea(_) | Feature::Dependents(_))
    }
}

fn indicator_name<C: Category>(value: C) -> Cow<'static, str> {
    Cow::Owned(format!("{}_{}", C::FIELD, value.label()))
}

fn indicator_value<C: Category>(name: &str) -> Option<C> {
    let label = name.strip_prefix(C::FIELD)?.strip_prefix('_')?;
    C::ALL.iter().copied().find(|c| c.label() == label)
}

/// Digest identifying a schema: encoding version plus ordered column names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaFingerprint(String);

impl SchemaFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered list of the final feature columns.
///
/// Invariants: every base feature appears exactly once, no column repeats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u32,
    features: Vec<Feature>,
}

impl FeatureSchema {
    /// Build a schema from an explicit column order.
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        let schema = Self {
            version: ENCODING_VERSION,
            features,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Base features followed by the indicator columns of the observed
    /// categories, each group sorted by category label.
    pub fn from_observed(
        property_areas: &BTreeSet<PropertyArea>,
        dependents: &BTreeSet<Dependents>,
    ) -> Self {
        let mut features = BASE_FEATURES.to_vec();
        features.extend(property_areas.iter().copied().map(Feature::PropertyArea));
        features.extend(dependents.iter().copied().map(Feature::Dependents));
        Self {
            version: ENCODING_VERSION,
            features,
        }
    }

    /// Build a schema from cleaned-table column names, in the given order.
    pub fn from_column_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let features = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                Feature::from_column_name(name).ok_or_else(|| {
                    LoanError::InvalidSchema(format!("unrecognised feature column `{name}`"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(features)
    }

    /// Check the schema invariants, including the encoding version.
    pub fn validate(&self) -> Result<()> {
        if self.version != ENCODING_VERSION {
            return Err(LoanError::InvalidSchema(format!(
                "encoding version {} is not supported (expected {})",
                self.version, ENCODING_VERSION
            )));
        }
        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            if !seen.insert(*feature) {
                return Err(LoanError::InvalidSchema(format!(
                    "column `{}` appears more than once",
                    feature.column_name()
                )));
            }
        }
        if let Some(missing) = BASE_FEATURES.iter().find(|f| !seen.contains(f)) {
            return Err(LoanError::InvalidSchema(format!(
                "required column `{}` is absent",
                missing.column_name()
            )));
        }
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn position(&self, feature: Feature) -> Option<usize> {
        self.features.iter().position(|f| *f == feature)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|f| f.column_name().into_owned())
            .collect()
    }

    pub fn fingerprint(&self) -> SchemaFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(format!("v{}", self.version).as_bytes());
        for feature in &self.features {
            hasher.update(b"\n");
            hasher.update(feature.column_name().as_bytes());
        }
        let digest = hasher.finalize();
        SchemaFingerprint(digest.iter().map(|b| format!("{b:02x}")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_observed() -> FeatureSchema {
        FeatureSchema::from_observed(
            &PropertyArea::ALL.iter().copied().collect(),
            &Dependents::ALL.iter().copied().collect(),
        )
    }

    #[test]
    fn test_observed_schema_order() {
        let schema = all_observed();
        assert_eq!(
            schema.column_names(),
            vec![
                "Gender",
                "Married",
                "Education",
                "Self_Employed",
                "ApplicantIncome",
                "CoapplicantIncome",
                "LoanAmount",
                "Loan_Amount_Term",
                "Credit_History",
                "Property_Area_Rural",
                "Property_Area_Semiurban",
                "Property_Area_Urban",
                "Dependents_0",
                "Dependents_1",
                "Dependents_2",
                "Dependents_3+",
            ]
        );
    }

    #[test]
    fn test_observed_schema_only_includes_seen_categories() {
        let areas = [PropertyArea::Urban].into_iter().collect();
        let deps = [Dependents::ThreePlus, Dependents::Zero].into_iter().collect();
        let schema = FeatureSchema::from_observed(&areas, &deps);
        assert_eq!(schema.len(), N_BASE + 3);
        assert_eq!(
            &schema.column_names()[N_BASE..],
            &["Property_Area_Urban", "Dependents_0", "Dependents_3+"]
        );
    }

    #[test]
    fn test_column_name_roundtrip() {
        for feature in all_observed().features() {
            let name = feature.column_name();
            assert_eq!(Feature::from_column_name(&name), Some(*feature));
        }
        assert_eq!(Feature::from_column_name("Dependents_4"), None);
        assert_eq!(Feature::from_column_name("Loan_ID"), None);
    }

    #[test]
    fn test_from_column_names_rejects_unknown() {
        let mut names: Vec<String> = all_observed().column_names();
        names.push("Loan_ID".to_string());
        let err = FeatureSchema::from_column_names(&names).unwrap_err();
        assert!(matches!(err, LoanError::InvalidSchema(_)));
    }

    #[test]
    fn test_from_column_names_requires_base_features() {
        let names = ["Gender", "Married", "Property_Area_Urban"];
        assert!(matches!(
            FeatureSchema::from_column_names(names),
            Err(LoanError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let mut features = BASE_FEATURES.to_vec();
        features.push(Feature::Dependents(Dependents::One));
        features.push(Feature::Dependents(Dependents::One));
        assert!(FeatureSchema::new(features).is_err());
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let a = all_observed();
        let mut reordered = a.features().to_vec();
        reordered.swap(0, 1);
        let b = FeatureSchema::new(reordered).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), all_observed().fingerprint());
        assert_eq!(a.fingerprint().as_str().len(), 64);
    }
}
