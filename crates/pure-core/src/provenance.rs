//! Schema tags and run provenance written next to model and inference
//! artefacts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, PureError};

/// Layout version of a persisted JSON document.
///
/// Readers accept any minor version of their own major version; minor bumps
/// only add optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented when a field changes meaning or disappears.
    pub major: u32,
    /// Incremented when optional fields are added.
    pub minor: u32,
}

impl SchemaVersion {
    /// Version written by this build.
    pub const CURRENT: SchemaVersion = SchemaVersion { major: 1, minor: 0 };

    /// Fails with `schema-version` when `self` cannot be read by this build.
    pub fn ensure_readable(&self) -> Result<(), PureError> {
        if self.major == Self::CURRENT.major {
            return Ok(());
        }
        Err(PureError::Serde(
            ErrorInfo::new(
                "schema-version",
                format!("document schema {self} is not readable"),
            )
            .with_context("found", self.to_string())
            .with_context("supported", Self::CURRENT.to_string()),
        ))
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Inputs and environment of one fitting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Layout version of the enclosing manifest.
    #[serde(default)]
    pub schema: SchemaVersion,
    /// Hash of the driver configuration.
    pub config_hash: String,
    /// Hash of the model description as loaded, before initial conditions.
    pub model_hash: String,
    /// Hash of the preprocessed replicate tables.
    pub data_hash: String,
    /// Master sampler seed.
    pub seed: u64,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Crate name to version.
    pub tool_versions: BTreeMap<String, String>,
}
