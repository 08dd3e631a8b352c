use std::path::Path;

use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};

/// Reads `species,value` pairs from a headerless two-column CSV.
///
/// Entries keep file order; a repeated species keeps its last value. NaN and
/// infinite values fail with code `parse`.
pub fn load_initial_conditions(path: &Path) -> Result<IndexMap<String, f64>, PureError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| PureError::Data(ErrorInfo::new("read", err.to_string()).with_path(path)))?;

    let mut values = IndexMap::new();
    for (index, record) in reader.deserialize::<(String, f64)>().enumerate() {
        let row_error = |message: String| {
            PureError::Data(
                ErrorInfo::new("parse", message)
                    .with_path(path)
                    .with_context("row", (index + 1).to_string()),
            )
        };
        let (species, value) = record.map_err(|err| row_error(err.to_string()))?;
        if !value.is_finite() {
            return Err(row_error(format!("{species} has non-finite value {value}")));
        }
        values.insert(species, value);
    }
    Ok(values)
}
