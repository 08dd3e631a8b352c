use std::path::Path;

use log::debug;
use pure_core::errors::{ErrorInfo, PureError};
use serde::{Deserialize, Serialize};

/// Numeric table whose first column is time in seconds.
///
/// Every row has exactly one value per column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Builds a table from column names and rows of matching width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, PureError> {
        if columns.len() < 2 {
            return Err(PureError::Validation(
                ErrorInfo::new("columns", "a time series needs a time column and one channel")
                    .with_context("columns", columns.len().to_string()),
            ));
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(PureError::Validation(
                ErrorInfo::new("row-width", "row width does not match the column count")
                    .with_context("row", (index + 1).to_string())
                    .with_context("expected", columns.len().to_string())
                    .with_context("found", row.len().to_string()),
            ));
        }
        Ok(Self { columns, rows })
    }

    /// All column names, time first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Names of the measured channels (every column except time).
    pub fn channel_names(&self) -> &[String] {
        &self.columns[1..]
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time column.
    pub fn time(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row[0]).collect()
    }

    /// Values of a named channel, if present.
    pub fn channel(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.columns.iter().skip(1).position(|column| column == name)? + 1;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<f64>> {
        &mut self.rows
    }
}

fn parse_error(path: &Path, row: usize, message: impl Into<String>) -> PureError {
    PureError::Data(
        ErrorInfo::new("parse", message)
            .with_path(path)
            .with_context("row", row.to_string()),
    )
}

/// Reads a comma separated time series.
///
/// The first line is a header and is skipped; `columns` names the fields in
/// order. Each remaining record must hold exactly `columns.len()` numeric
/// finite fields. Malformed records and NaN or infinite values fail with
/// code `parse`, unreadable files with code `read`.
pub fn load_time_series(path: &Path, columns: &[&str]) -> Result<TimeSeries, PureError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| PureError::Data(ErrorInfo::new("read", err.to_string()).with_path(path)))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let record = record.map_err(|err| {
            if err.is_io_error() {
                PureError::Data(ErrorInfo::new("read", err.to_string()).with_path(path))
            } else {
                parse_error(path, line, err.to_string())
            }
        })?;
        if record.len() != columns.len() {
            return Err(parse_error(
                path,
                line,
                format!("expected {} fields, found {}", columns.len(), record.len()),
            ));
        }
        let mut row = Vec::with_capacity(columns.len());
        for (field, column) in record.iter().zip(columns) {
            let field_error = |message: String| {
                PureError::Data(
                    ErrorInfo::new("parse", message)
                        .with_path(path)
                        .with_context("row", line.to_string())
                        .with_context("column", *column),
                )
            };
            let value: f64 = field
                .parse()
                .map_err(|_| field_error(format!("'{field}' is not a number")))?;
            // `f64::from_str` accepts NaN and inf spellings.
            if !value.is_finite() {
                return Err(field_error(format!("'{field}' is not a finite number")));
            }
            row.push(value);
        }
        rows.push(row);
    }
    debug!("loaded {} rows from {}", rows.len(), path.display());
    TimeSeries::new(columns.iter().map(|column| column.to_string()).collect(), rows)
}
