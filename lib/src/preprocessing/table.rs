//! Raw and cleaned loan tables, and their CSV layouts.

use crate::dataset::InMemoryDataset;
use crate::error::{LoanError, Result};
use crate::preprocessing::encoding::categorical::{
    BinaryCategory, Category, Dependents, Education, Gender, LoanStatus, Married, PropertyArea,
    SelfEmployed,
};
use crate::preprocessing::encoding::schema::columns;
use crate::preprocessing::encoding::{EncodedFeatureVector, FeatureSchema};
use crate::record::{LoanRecord, RawRow};
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Columns a raw table must carry.
pub const REQUIRED_RAW_COLUMNS: [&str; 11] = [
    Gender::FIELD,
    Married::FIELD,
    Dependents::FIELD,
    Education::FIELD,
    SelfEmployed::FIELD,
    columns::APPLICANT_INCOME,
    columns::COAPPLICANT_INCOME,
    columns::LOAN_AMOUNT,
    columns::LOAN_AMOUNT_TERM,
    columns::CREDIT_HISTORY,
    PropertyArea::FIELD,
];

/// Records read from a raw CSV, before any cleaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub records: Vec<LoanRecord>,
    /// Whether the header carried a `Loan_Status` column.
    pub labelled: bool,
    /// Header columns that are not loan attributes (`Loan_ID` and extras).
    pub dropped_columns: Vec<String>,
}

impl RawTable {
    /// Build a table from records already in memory.
    pub fn from_records(records: Vec<LoanRecord>, labelled: bool) -> Self {
        Self {
            records,
            labelled,
            dropped_columns: Vec::new(),
        }
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Parse a raw table. Categorical cells are checked against their
    /// dictionaries here, so an unmapped value fails with its row number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        check_raw_header(&headers)?;

        let labelled = headers.iter().any(|h| h == LoanStatus::FIELD);
        let dropped_columns = headers
            .iter()
            .filter(|h| !REQUIRED_RAW_COLUMNS.contains(h) && *h != LoanStatus::FIELD)
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| LoanError::from(e).at_row(row))?;
            let raw: RawRow = record
                .deserialize(Some(&headers))
                .map_err(|e| LoanError::from(e).at_row(row))?;
            records.push(raw.into_record().map_err(|e| e.at_row(row))?);
        }

        Ok(Self {
            records,
            labelled,
            dropped_columns,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check_raw_header(headers: &StringRecord) -> Result<()> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    let expanded = |field: &str| {
        let prefix = format!("{field}_");
        headers.iter().any(|h| h.starts_with(&prefix))
    };

    for field in [PropertyArea::FIELD, Dependents::FIELD] {
        if !has(field) && expanded(field) {
            return Err(LoanError::AlreadyCleaned);
        }
    }
    match REQUIRED_RAW_COLUMNS.iter().find(|c| !has(c)) {
        Some(missing) => Err(LoanError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Model-ready table: one encoded vector per row, all under one schema.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedTable {
    pub schema: FeatureSchema,
    pub rows: Vec<EncodedFeatureVector>,
    /// Class labels, when the source table was labelled.
    pub labels: Option<Vec<LoanStatus>>,
}

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header in file order: base features, `Loan_Status`, then indicators.
    pub fn header(&self) -> Vec<String> {
        let mut names = self.schema.column_names();
        if self.labels.is_some() {
            let at = self
                .schema
                .features()
                .iter()
                .position(|f| f.is_indicator())
                .unwrap_or(names.len());
            names.insert(at, LoanStatus::FIELD.to_string());
        }
        names
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_writer(File::create(path)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.header())?;

        let label_at = self
            .schema
            .features()
            .iter()
            .position(|f| f.is_indicator())
            .unwrap_or(self.schema.len());
        for (i, row) in self.rows.iter().enumerate() {
            let mut cells: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
            if let Some(labels) = &self.labels {
                cells.insert(label_at, labels[i].code().to_string());
            }
            writer.write_record(&cells)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Parse a cleaned table. The header, minus `Loan_Status`, is the schema.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let label_at = headers.iter().position(|h| h == LoanStatus::FIELD);
        let schema =
            FeatureSchema::from_column_names(headers.iter().filter(|h| *h != LoanStatus::FIELD))?;
        let fingerprint = schema.fingerprint();

        let mut rows = Vec::new();
        let mut labels = label_at.map(|_| Vec::new());
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| LoanError::from(e).at_row(row))?;
            let mut values = Vec::with_capacity(schema.len());
            for (col, cell) in record.iter().enumerate() {
                let value = parse_cell(&headers[col], cell).map_err(|e| e.at_row(row))?;
                if Some(col) == label_at {
                    let status = LoanStatus::from_code(value).ok_or_else(|| {
                        LoanError::InvalidInput {
                            field: LoanStatus::FIELD,
                            reason: format!("label must be 0 or 1, got {value}"),
                        }
                        .at_row(row)
                    })?;
                    if let Some(labels) = labels.as_mut() {
                        labels.push(status);
                    }
                } else {
                    values.push(value);
                }
            }
            rows.push(EncodedFeatureVector::new(values, fingerprint.clone()));
        }

        Ok(Self {
            schema,
            rows,
            labels,
        })
    }

    /// Feature matrix and class labels for training.
    pub fn to_dataset(&self) -> Result<InMemoryDataset> {
        let labels = self
            .labels
            .as_ref()
            .ok_or_else(|| LoanError::MissingColumn(LoanStatus::FIELD.to_string()))?;
        let rows: Vec<&[f64]> = self.rows.iter().map(|r| r.values()).collect();
        let classes: Vec<u8> = labels.iter().map(|l| l.class()).collect();
        InMemoryDataset::from_rows(&rows, &classes)
    }
}

fn parse_cell(column: &str, cell: &str) -> Result<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Err(LoanError::MissingValue {
            column: column.to_string(),
        });
    }
    let value: f64 = cell.parse().map_err(|_| LoanError::InvalidSchema(format!(
        "column `{column}` holds non-numeric value `{cell}`"
    )))?;
    if !value.is_finite() {
        return Err(LoanError::InvalidSchema(format!(
            "column `{column}` holds non-finite value `{cell}`"
        )));
    }
    Ok(value)
}
