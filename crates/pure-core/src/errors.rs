//! Error type shared by every crate of the toolkit.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic carried by every [`PureError`].
///
/// `code` is a short kebab-case identifier that tests and callers match on;
/// `message` is for people. `context` names the offending inputs (species,
/// parameter, path, row) and is kept sorted so rendered errors are stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable kebab-case identifier.
    pub code: String,
    /// Human readable description.
    pub message: String,
    /// Offending inputs by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// Suggested fix, when one is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one offending input; a repeated key keeps the last value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Records the file the failure concerns under `path`.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Attaches a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the PURE toolkit.
///
/// Every failure aborts the current run; no variant is retried or recovered
/// from inside the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PureError {
    /// An argument lacked a required capability (e.g. a non-species passed
    /// where a species is expected).
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// Malformed or missing experimental data.
    #[error("data error: {0}")]
    Data(ErrorInfo),
    /// Inconsistent reaction network or model description.
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Failures raised by a simulation backend.
    #[error("simulation error: {0}")]
    Simulation(ErrorInfo),
    /// Failures raised by priors, samplers or posterior handling.
    #[error("inference error: {0}")]
    Inference(ErrorInfo),
    /// Serialization, schema and filesystem errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        let mut separator = " (";
        for (key, value) in &self.context {
            write!(f, "{separator}{key}: {value}")?;
            separator = ", ";
        }
        if !self.context.is_empty() {
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; {hint}"),
            None => Ok(()),
        }
    }
}

impl PureError {
    /// Diagnostic payload regardless of family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PureError::Validation(info)
            | PureError::Data(info)
            | PureError::Model(info)
            | PureError::Simulation(info)
            | PureError::Inference(info)
            | PureError::Serde(info) => info,
        }
    }

    /// Shorthand for `self.info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Wraps a filesystem failure on `path` as a serde-family error.
    pub fn io(code: &str, path: &Path, err: std::io::Error) -> Self {
        PureError::Serde(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}
