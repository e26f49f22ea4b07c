//! One-hot expansion of `Property_Area` and `Dependents`.
//!
//! Fitting observes which categories occur and fixes the output schema.
//! The fitted encoder is the single place where a coded record becomes an
//! [`EncodedFeatureVector`], for training rows and for served applications
//! alike.

use crate::error::{LoanError, Result};
use crate::preprocessing::encoding::categorical::{
    BinaryCategory, Category, Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};
use crate::preprocessing::encoding::schema::{
    Feature, FeatureSchema, SchemaFingerprint, BASE_FEATURES, N_BASE,
};
use crate::preprocessing::encoding::{CodedRecord, EncodedFeatureVector};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::record::{LoanApplication, LoanRecord};
use std::collections::BTreeSet;

/// Fields a coded record carries: the base features plus the two expanded ones.
const N_INPUT_FIELDS: usize = N_BASE + 2;

/// One-hot encoder for the multi-valued loan categories.
///
/// # Example
/// ```ignore
/// use loan_approval::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// let encoder = OneHotEncoder.fit(&filled_rows)?;
/// let vector = encoder.transform(&filled_rows[0])?;
/// assert_eq!(vector.len(), encoder.schema().len());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct OneHotEncoder;

impl Transformer for OneHotEncoder {
    type Input = [CodedRecord];
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.is_empty() {
            return Err(LoanError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let property_areas: BTreeSet<PropertyArea> =
            data.iter().filter_map(|r| r.property_area).collect();
        let dependents: BTreeSet<Dependents> = data.iter().filter_map(|r| r.dependents).collect();

        Ok(FittedOneHotEncoder::new(FeatureSchema::from_observed(
            &property_areas,
            &dependents,
        )))
    }
}

/// Fitted encoder: a schema plus its precomputed fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedOneHotEncoder {
    schema: FeatureSchema,
    fingerprint: SchemaFingerprint,
}

impl FittedOneHotEncoder {
    pub fn new(schema: FeatureSchema) -> Self {
        let fingerprint = schema.fingerprint();
        Self {
            schema,
            fingerprint,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn fingerprint(&self) -> &SchemaFingerprint {
        &self.fingerprint
    }

    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.schema.len()
    }

    /// Encode a complete application.
    pub fn encode_application(&self, app: &LoanApplication) -> Result<EncodedFeatureVector> {
        self.transform(&CodedRecord::from(&LoanRecord::from(app)))
    }

    /// Verify that `vector` was produced under this encoder's schema.
    pub fn check(&self, vector: &EncodedFeatureVector) -> Result<()> {
        if vector.len() != self.schema.len() {
            return Err(LoanError::EncodingMismatch {
                detail: format!(
                    "expected {} features, got {}",
                    self.schema.len(),
                    vector.len()
                ),
            });
        }
        if vector.fingerprint() != &self.fingerprint {
            return Err(LoanError::EncodingMismatch {
                detail: format!(
                    "vector schema {} does not match model schema {}",
                    vector.fingerprint(),
                    self.fingerprint
                ),
            });
        }
        Ok(())
    }

    /// Recover the application an encoded vector was built from.
    ///
    /// Fails if a binary code is not `0`/`1`, or an indicator group does not
    /// have exactly one column set.
    pub fn decode(&self, vector: &EncodedFeatureVector) -> Result<LoanApplication> {
        self.check(vector)?;

        let mut base = [0.0; N_BASE];
        let mut property_area = None;
        let mut dependents = None;

        for (feature, &value) in self.schema.features().iter().zip(vector.values()) {
            if let Some(idx) = feature.base_index() {
                base[idx] = value;
                continue;
            }
            let hot = indicator_bit(feature, value)?;
            match feature {
                Feature::PropertyArea(area) if hot => set_once(&mut property_area, *area)?,
                Feature::Dependents(count) if hot => set_once(&mut dependents, *count)?,
                _ => {}
            }
        }

        Ok(LoanApplication {
            gender: decode_binary::<Gender>(base[0])?,
            married: decode_binary::<Married>(base[1])?,
            education: decode_binary::<Education>(base[2])?,
            self_employed: decode_binary::<SelfEmployed>(base[3])?,
            applicant_income: base[4],
            coapplicant_income: base[5],
            loan_amount: base[6],
            loan_amount_term: base[7],
            credit_history: base[8],
            property_area: require_hot(property_area)?,
            dependents: require_hot(dependents)?,
        })
    }

    fn ensure_known<C: Category>(&self, value: Option<C>, feature: fn(C) -> Feature) -> Result<()> {
        match value {
            Some(v) if self.schema.position(feature(v)).is_none() => {
                Err(LoanError::EncodingMismatch {
                    detail: format!(
                        "{} value `{}` was not seen in training and has no indicator column",
                        C::FIELD,
                        v.label()
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = CodedRecord;
    type Output = EncodedFeatureVector;
    type Params = FeatureSchema;

    /// Lay a gap-free coded record out in schema order.
    ///
    /// A missing multi-valued category leaves its indicator group all zero.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.ensure_known(data.property_area, Feature::PropertyArea)?;
        self.ensure_known(data.dependents, Feature::Dependents)?;

        let values = self
            .schema
            .features()
            .iter()
            .map(|feature| match feature {
                Feature::PropertyArea(area) => Ok(indicator(data.property_area == Some(*area))),
                Feature::Dependents(count) => Ok(indicator(data.dependents == Some(*count))),
                base => {
                    let idx = base.base_index().unwrap_or_default();
                    data.base[idx].ok_or_else(|| LoanError::MissingValue {
                        column: BASE_FEATURES[idx].column_name().into_owned(),
                    })
                }
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(EncodedFeatureVector::new(values, self.fingerprint.clone()))
    }

    fn extract_params(&self) -> Self::Params {
        self.schema.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(params))
    }

    fn n_features_in(&self) -> usize {
        N_INPUT_FIELDS
    }
}

fn indicator(hot: bool) -> f64 {
    if hot {
        1.0
    } else {
        0.0
    }
}

fn indicator_bit(feature: &Feature, value: f64) -> Result<bool> {
    match value {
        v if v == 1.0 => Ok(true),
        v if v == 0.0 => Ok(false),
        v => Err(LoanError::EncodingMismatch {
            detail: format!(
                "indicator `{}` must be 0 or 1, got {v}",
                feature.column_name()
            ),
        }),
    }
}

fn set_once<C: Category>(slot: &mut Option<C>, value: C) -> Result<()> {
    if slot.replace(value).is_some() {
        return Err(LoanError::EncodingMismatch {
            detail: format!("more than one {} indicator is set", C::FIELD),
        });
    }
    Ok(())
}

fn require_hot<C: Category>(slot: Option<C>) -> Result<C> {
    slot.ok_or_else(|| LoanError::EncodingMismatch {
        detail: format!("no {} indicator is set", C::FIELD),
    })
}

fn decode_binary<C: BinaryCategory>(code: f64) -> Result<C> {
    C::from_code(code).ok_or_else(|| LoanError::EncodingMismatch {
        detail: format!("{} code must be 0 or 1, got {code}", C::FIELD),
    })
}
