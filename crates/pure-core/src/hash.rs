//! Canonical JSON encoding and stable hashing of serialisable payloads.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, PureError};

fn map_err(err: serde_json::Error, code: &str) -> PureError {
    PureError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serialises a payload into compact JSON bytes.
///
/// Maps are emitted in their insertion or key order, so identical values
/// always produce identical bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, PureError> {
    serde_json::to_vec(value).map_err(|err| map_err(err, "canonical-serialize"))
}

/// Computes a stable hexadecimal SHA-256 hash for the provided payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, PureError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Writes a payload as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PureError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| PureError::io("json-mkdir", parent, err))?;
        }
    }
    let json = serde_json::to_string_pretty(value).map_err(|err| {
        PureError::Serde(ErrorInfo::new("json-serialize", err.to_string()).with_path(path))
    })?;
    fs::write(path, json).map_err(|err| PureError::io("json-write", path, err))
}

/// Reads a JSON payload from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PureError> {
    let contents = fs::read_to_string(path).map_err(|err| PureError::io("json-read", path, err))?;
    serde_json::from_str(&contents).map_err(|err| {
        PureError::Serde(ErrorInfo::new("json-parse", err.to_string()).with_path(path))
    })
}
