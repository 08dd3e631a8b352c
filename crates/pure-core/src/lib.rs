#![deny(missing_docs)]
#![doc = "Shared error, seeding, hashing and provenance types for the PURE transcription toolkit."]

pub mod errors;
pub mod hash;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, PureError};
pub use hash::{read_json, stable_hash_string, to_canonical_json_bytes, write_json};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Seconds in one hour, used for cutoffs and plot axes.
pub const SECONDS_PER_HOUR: f64 = 3600.0;
