//! Fixed dictionaries for the categorical loan fields.
//!
//! Every categorical column maps through one of the enums below. Binary
//! fields carry a numeric code (`Male → 0`, `Yes → 1`, ...); multi-valued
//! fields (`Dependents`, `Property_Area`) are expanded into indicator columns
//! by the one-hot encoder. A raw value outside a dictionary is an
//! [`LoanError::UnknownCategory`], never a silent missing value.

use crate::error::{LoanError, Result};
use serde::{Deserialize, Serialize};

/// A field whose values come from a fixed, finite enumeration.
pub trait Category: Copy + Eq + Ord + std::fmt::Debug + 'static {
    /// Column name in the raw table.
    const FIELD: &'static str;
    /// Every admissible value, sorted by label.
    const ALL: &'static [Self];

    /// The value as it appears in the raw table.
    fn label(self) -> &'static str;

    /// Look up a raw cell in the dictionary. Surrounding whitespace is ignored.
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == raw)
            .ok_or_else(|| LoanError::UnknownCategory {
                field: Self::FIELD,
                value: raw.to_string(),
            })
    }
}

/// A two-valued field encoded in place as `0` or `1`.
pub trait BinaryCategory: Category {
    fn code(self) -> f64;

    fn from_code(code: f64) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Category for Gender {
    const FIELD: &'static str = "Gender";
    const ALL: &'static [Self] = &[Gender::Female, Gender::Male];

    fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl BinaryCategory for Gender {
    fn code(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Married {
    No,
    Yes,
}

impl Category for Married {
    const FIELD: &'static str = "Married";
    const ALL: &'static [Self] = &[Married::No, Married::Yes];

    fn label(self) -> &'static str {
        match self {
            Married::No => "No",
            Married::Yes => "Yes",
        }
    }
}

impl BinaryCategory for Married {
    fn code(self) -> f64 {
        match self {
            Married::No => 0.0,
            Married::Yes => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate")]
    NotGraduate,
}

impl Category for Education {
    const FIELD: &'static str = "Education";
    const ALL: &'static [Self] = &[Education::Graduate, Education::NotGraduate];

    fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }
}

impl BinaryCategory for Education {
    fn code(self) -> f64 {
        match self {
            Education::NotGraduate => 0.0,
            Education::Graduate => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SelfEmployed {
    No,
    Yes,
}

impl Category for SelfEmployed {
    const FIELD: &'static str = "Self_Employed";
    const ALL: &'static [Self] = &[SelfEmployed::No, SelfEmployed::Yes];

    fn label(self) -> &'static str {
        match self {
            SelfEmployed::No => "No",
            SelfEmployed::Yes => "Yes",
        }
    }
}

impl BinaryCategory for SelfEmployed {
    fn code(self) -> f64 {
        match self {
            SelfEmployed::No => 0.0,
            SelfEmployed::Yes => 1.0,
        }
    }
}

/// Number of dependents. One-hot encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dependents {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3+")]
    ThreePlus,
}

impl Category for Dependents {
    const FIELD: &'static str = "Dependents";
    const ALL: &'static [Self] = &[
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreePlus,
    ];

    fn label(self) -> &'static str {
        match self {
            Dependents::Zero => "0",
            Dependents::One => "1",
            Dependents::Two => "2",
            Dependents::ThreePlus => "3+",
        }
    }
}

/// Location class of the property. One-hot encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyArea {
    Rural,
    Semiurban,
    Urban,
}

impl Category for PropertyArea {
    const FIELD: &'static str = "Property_Area";
    const ALL: &'static [Self] = &[
        PropertyArea::Rural,
        PropertyArea::Semiurban,
        PropertyArea::Urban,
    ];

    fn label(self) -> &'static str {
        match self {
            PropertyArea::Rural => "Rural",
            PropertyArea::Semiurban => "Semiurban",
            PropertyArea::Urban => "Urban",
        }
    }
}

/// Training label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "N")]
    Rejected,
    #[serde(rename = "Y")]
    Approved,
}

impl Category for LoanStatus {
    const FIELD: &'static str = "Loan_Status";
    const ALL: &'static [Self] = &[LoanStatus::Rejected, LoanStatus::Approved];

    fn label(self) -> &'static str {
        match self {
            LoanStatus::Rejected => "N",
            LoanStatus::Approved => "Y",
        }
    }
}

impl BinaryCategory for LoanStatus {
    fn code(self) -> f64 {
        match self {
            LoanStatus::Rejected => 0.0,
            LoanStatus::Approved => 1.0,
        }
    }
}

impl LoanStatus {
    /// Class index used by the classifier.
    pub fn class(self) -> u8 {
        match self {
            LoanStatus::Rejected => 0,
            LoanStatus::Approved => 1,
        }
    }
}
