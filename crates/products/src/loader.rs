//! CSV dataset loader.
//!
//! Reads a header-row CSV into a [`ProductTable`]. Required columns are
//! `category`, `sub_category`, `brand`, `sale_price` and `market_price`; any
//! other column is ignored except by [`MissingValuePolicy::AnyColumn`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::{ProductRow, ProductTable};

const REQUIRED_COLUMNS: [&str; 5] = ["category", "sub_category", "brand", "sale_price", "market_price"];

/// Tokens treated as "no value", matching what spreadsheet exports emit.
const MISSING_TOKENS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "None"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("malformed row at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("invalid number {value:?} in column {column} at line {line}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Which missing values cause a row to be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Drop a row only when a required column is missing.
    #[default]
    RequiredColumns,
    /// Drop a row when any column is missing.
    AnyColumn,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub missing_values: MissingValuePolicy,
    pub delimiter: Option<u8>,
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Load the product table from a CSV file.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<(ProductTable, LoadReport), LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, options, path.display().to_string())
}

/// Load the product table from any reader (in-memory CSV, network body, ...).
pub fn load_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<(ProductTable, LoadReport), LoadError> {
    read_table(reader, options, "<reader>".to_string())
}

struct ColumnIndex {
    category: usize,
    sub_category: usize,
    brand: usize,
    sale_price: usize,
    market_price: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{FEFF}').trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        let [category, sub_category, brand, sale_price, market_price] = REQUIRED_COLUMNS;
        Ok(Self {
            category: find(category)?,
            sub_category: find(sub_category)?,
            brand: find(brand)?,
            sale_price: find(sale_price)?,
            market_price: find(market_price)?,
        })
    }

    fn required(&self) -> [usize; 5] {
        [self.category, self.sub_category, self.brand, self.sale_price, self.market_price]
    }
}

fn read_table<R: Read>(reader: R, options: &LoadOptions, source: String) -> Result<(ProductTable, LoadReport), LoadError> {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(false).trim(csv::Trim::All);
    if let Some(delimiter) = options.delimiter {
        builder.delimiter(delimiter);
    }
    let mut reader = builder.from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut rows_read = 0usize;

    for result in reader.records() {
        let record = result.map_err(malformed)?;
        rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let incomplete = match options.missing_values {
            MissingValuePolicy::RequiredColumns => columns
                .required()
                .iter()
                .any(|&i| is_missing(record.get(i).unwrap_or(""))),
            MissingValuePolicy::AnyColumn => record.iter().any(is_missing),
        };
        if incomplete {
            tracing::debug!(line, "dropping row with missing values");
            continue;
        }

        let field = |i: usize| record.get(i).unwrap_or("");
        let sale_price = parse_price(field(columns.sale_price), "sale_price", line)?;
        let market_price = parse_price(field(columns.market_price), "market_price", line)?;

        rows.push(ProductRow::new(
            field(columns.category),
            field(columns.sub_category),
            field(columns.brand),
            sale_price,
            market_price,
        ));
    }

    let report = LoadReport {
        source,
        rows_read,
        rows_kept: rows.len(),
        rows_dropped: rows_read - rows.len(),
        loaded_at: Utc::now(),
    };

    tracing::info!(
        source = %report.source,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped,
        "product dataset loaded"
    );

    Ok((ProductTable::from_rows(rows), report))
}

fn malformed(err: csv::Error) -> LoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => LoadError::Malformed {
            line,
            message: format!("expected {expected_len} fields, found {len}"),
        },
        csv::ErrorKind::Utf8 { .. } => LoadError::Malformed {
            line,
            message: "invalid UTF-8".to_string(),
        },
        _ => LoadError::Csv(err),
    }
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

fn parse_price(value: &str, column: &'static str, line: u64) -> Result<f64, LoadError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::InvalidNumber {
            line,
            column,
            value: value.to_string(),
        }),
    }
}
