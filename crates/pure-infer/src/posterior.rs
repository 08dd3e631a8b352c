use std::path::Path;

use indexmap::IndexMap;
use log::warn;
use pure_core::errors::{ErrorInfo, PureError};

/// Rows averaged by [`PosteriorSamples::trailing_mean`] unless configured.
pub const DEFAULT_TRAILING_WINDOW: usize = 500;

/// Raw samples reloaded from a headerless samples file.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorSamples {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn samples_error(code: &str, message: impl Into<String>, path: &Path) -> PureError {
    PureError::Inference(ErrorInfo::new(code, message).with_path(path))
}

impl PosteriorSamples {
    /// Reads the file positionally, labelling column `i` with `names[i]`.
    pub fn load(path: &Path, names: &[String]) -> Result<Self, PureError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|err| samples_error("samples-read", err.to_string(), path))?;
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record =
                record.map_err(|err| samples_error("samples-read", err.to_string(), path))?;
            if record.len() != names.len() {
                return Err(PureError::Inference(
                    ErrorInfo::new("samples-shape", "column count does not match the labels")
                        .with_path(path)
                        .with_context("row", (index + 1).to_string())
                        .with_context("expected", names.len().to_string())
                        .with_context("found", record.len().to_string()),
                ));
            }
            let row = record
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        PureError::Inference(
                            ErrorInfo::new("samples-parse", format!("'{field}' is not a number"))
                                .with_path(path)
                                .with_context("row", (index + 1).to_string()),
                        )
                    })
                })
                .collect::<Result<Vec<f64>, PureError>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(samples_error("no-samples", "samples file has no rows", path));
        }
        Ok(Self {
            names: names.to_vec(),
            rows,
        })
    }

    /// Builds a sample set in memory; every row must match `names`.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, PureError> {
        if rows.is_empty() {
            return Err(PureError::Inference(ErrorInfo::new(
                "no-samples",
                "sample set has no rows",
            )));
        }
        if rows.iter().any(|row| row.len() != names.len()) {
            return Err(PureError::Inference(
                ErrorInfo::new("samples-shape", "row width does not match the labels")
                    .with_context("expected", names.len().to_string()),
            ));
        }
        Ok(Self { names, rows })
    }

    /// Column labels.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a loaded sample set.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one labelled column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.names.iter().position(|label| label == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Last `window` rows, or all rows when there are fewer.
    pub fn tail(&self, window: usize) -> &[Vec<f64>] {
        let start = self.rows.len().saturating_sub(window);
        &self.rows[start..]
    }

    /// Per-parameter mean of the last `window` rows.
    pub fn trailing_mean(&self, window: usize) -> Result<IndexMap<String, f64>, PureError> {
        if window == 0 {
            return Err(PureError::Validation(ErrorInfo::new(
                "trailing-window",
                "trailing window must be at least 1",
            )));
        }
        if window > self.rows.len() {
            warn!(
                "trailing window {window} exceeds the {} available samples; averaging all rows",
                self.rows.len()
            );
        }
        let tail = self.tail(window);
        let count = tail.len() as f64;
        Ok(self
            .names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let sum: f64 = tail.iter().map(|row| row[index]).sum();
                (name.clone(), sum / count)
            })
            .collect())
    }
}
