//! Median imputer.
//!
//! After dictionary lookup every base feature is numeric (binary categories
//! included), so one median per base column covers every gap. Medians are
//! learned from the table being cleaned on each run; there is no stored
//! fallback constant.

use crate::error::{LoanError, Result};
use crate::preprocessing::encoding::{CodedRecord, BASE_FEATURES, N_BASE};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};

/// Median of `values`, or `None` if empty.
///
/// An even count averages the two middle values.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

/// MedianImputer transformer (unfitted).
#[derive(Clone, Copy, Debug, Default)]
pub struct MedianImputer;

/// Serializable parameters for a fitted MedianImputer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedianImputerParams {
    /// Fill value per base feature, in [`BASE_FEATURES`] order.
    pub medians: Vec<f64>,
}

impl Transformer for MedianImputer {
    type Input = [CodedRecord];
    type Fitted = FittedMedianImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.is_empty() {
            return Err(LoanError::EmptyData(
                "Cannot fit MedianImputer on empty data".to_string(),
            ));
        }

        let mut medians = [0.0; N_BASE];
        for (col, slot) in medians.iter_mut().enumerate() {
            let mut present: Vec<f64> = data.iter().filter_map(|r| r.base[col]).collect();
            *slot = median(&mut present).ok_or_else(|| LoanError::NoObservedValues {
                column: BASE_FEATURES[col].column_name().into_owned(),
            })?;
        }

        Ok(FittedMedianImputer { medians })
    }
}

/// Fitted MedianImputer ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedMedianImputer {
    medians: [f64; N_BASE],
}

impl FittedMedianImputer {
    /// Fill values for each base feature.
    pub fn medians(&self) -> &[f64; N_BASE] {
        &self.medians
    }

    /// Fill the gaps of a single record.
    pub fn fill(&self, record: &CodedRecord) -> CodedRecord {
        let mut filled = record.clone();
        for (value, median) in filled.base.iter_mut().zip(self.medians) {
            value.get_or_insert(median);
        }
        filled
    }
}

impl FittedTransformer for FittedMedianImputer {
    type Input = [CodedRecord];
    type Output = Vec<CodedRecord>;
    type Params = MedianImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        Ok(data.iter().map(|r| self.fill(r)).collect())
    }

    fn extract_params(&self) -> Self::Params {
        MedianImputerParams {
            medians: self.medians.to_vec(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        let medians: [f64; N_BASE] = params.medians.as_slice().try_into().map_err(|_| {
            LoanError::InvalidParameter(format!(
                "expected {} medians, got {}",
                N_BASE,
                params.medians.len()
            ))
        })?;
        Ok(Self { medians })
    }

    fn n_features_in(&self) -> usize {
        N_BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(base: [Option<f64>; N_BASE]) -> CodedRecord {
        CodedRecord {
            base,
            property_area: None,
            dependents: None,
        }
    }

    fn full(v: f64) -> [Option<f64>; N_BASE] {
        [Some(v); N_BASE]
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_median_is_robust_to_outliers() {
        assert_eq!(median(&mut [100.0, 110.0, 120.0, 90_000.0, 105.0]), Some(110.0));
    }

    #[test]
    fn test_imputer_fills_gaps_with_column_median() {
        let mut gap = full(0.0);
        gap[4] = None;
        gap[6] = None;
        let mut a = full(0.0);
        a[4] = Some(2000.0);
        a[6] = Some(100.0);
        let mut b = full(0.0);
        b[4] = Some(6000.0);
        b[6] = Some(200.0);
        let mut c = full(0.0);
        c[4] = Some(3000.0);
        c[6] = Some(130.0);
        let data = vec![row(a), row(gap), row(b), row(c)];

        let fitted = MedianImputer.fit(&data).unwrap();
        assert_eq!(fitted.medians()[4], 3000.0);
        assert_eq!(fitted.medians()[6], 130.0);

        let filled = fitted.transform(&data).unwrap();
        assert_eq!(filled[1].base[4], Some(3000.0));
        assert_eq!(filled[1].base[6], Some(130.0));
        assert_eq!(filled[0], data[0]);
        assert!(filled.iter().all(|r| r.missing_count() == 0));
    }

    #[test]
    fn test_binary_code_median_can_be_fractional() {
        let mut a = full(1.0);
        a[0] = Some(0.0);
        let b = full(1.0);
        let mut gap = full(1.0);
        gap[0] = None;
        let fitted = MedianImputer.fit(&[row(a), row(b), row(gap)]).unwrap();
        assert_eq!(fitted.medians()[0], 0.5);
    }

    #[test]
    fn test_column_without_values_fails() {
        let mut a = full(1.0);
        a[7] = None;
        let err = MedianImputer.fit(&[row(a.clone()), row(a)]).unwrap_err();
        assert!(
            matches!(err, LoanError::NoObservedValues { column } if column == "Loan_Amount_Term")
        );
    }

    #[test]
    fn test_empty_data() {
        assert!(matches!(
            MedianImputer.fit(&[]),
            Err(LoanError::EmptyData(_))
        ));
    }

    #[test]
    fn test_params_roundtrip() {
        let fitted = MedianImputer.fit(&[row(full(2.0)), row(full(4.0))]).unwrap();
        let restored = FittedMedianImputer::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored, fitted);
        assert_eq!(restored.n_features_in(), N_BASE);

        let bad = MedianImputerParams {
            medians: vec![1.0, 2.0],
        };
        assert!(FittedMedianImputer::from_params(bad).is_err());
    }
}
