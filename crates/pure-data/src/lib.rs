#![deny(missing_docs)]
#![doc = "Experimental time series for PURE transcription fits: CSV loading, baseline correction, truncation and per-replicate reshaping."]

/// Two-column initial-concentration tables.
pub mod initial;
/// Delimited time-series loading.
pub mod loader;
pub mod preprocess;

pub use initial::load_initial_conditions;
pub use loader::{load_time_series, TimeSeries};
pub use preprocess::{
    baseline, hours, preprocess, subtract_baseline, to_replicates, truncate, BaselinePolicy,
    Preprocessing, ReplicateTable,
};
