//! Baseline correction, truncation and per-replicate reshaping.
//!
//! [`preprocess`] always applies the steps in the same order: baseline from
//! the first row, subtraction from every row, inclusive truncation at the
//! cutoff, then one [`ReplicateTable`] per measured channel.

use log::info;
use pure_core::errors::{ErrorInfo, PureError};
use pure_core::SECONDS_PER_HOUR;
use serde::{Deserialize, Serialize};

use crate::loader::TimeSeries;

/// How the baseline is derived from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// Mean of the first row's channel values, subtracted from every channel.
    #[default]
    FirstRowMean,
    /// Each channel's own first-row value.
    FirstRowRaw,
}

fn default_cutoff_seconds() -> f64 {
    hours(3.0)
}

/// Preprocessing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessing {
    /// Baseline policy.
    #[serde(default)]
    pub baseline: BaselinePolicy,
    /// Rows with `time <= cutoff_seconds` are kept.
    #[serde(default = "default_cutoff_seconds")]
    pub cutoff_seconds: f64,
}

impl Default for Preprocessing {
    fn default() -> Self {
        Self {
            baseline: BaselinePolicy::default(),
            cutoff_seconds: default_cutoff_seconds(),
        }
    }
}

/// One replicate trajectory: a measured species observed at timepoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateTable {
    /// Model species the values measure.
    pub measurement: String,
    /// Source channel in the data file.
    pub channel: String,
    /// Observation times in seconds.
    pub timepoints: Vec<f64>,
    /// Baseline-corrected observations.
    pub values: Vec<f64>,
}

impl ReplicateTable {
    /// Number of observations.
    pub fn len(&self) -> usize {
        self.timepoints.len()
    }

    /// Whether the table has no observations.
    pub fn is_empty(&self) -> bool {
        self.timepoints.is_empty()
    }
}

/// Converts hours to seconds.
pub fn hours(value: f64) -> f64 {
    value * SECONDS_PER_HOUR
}

/// Baseline value for each channel.
pub fn baseline(series: &TimeSeries, policy: BaselinePolicy) -> Result<Vec<f64>, PureError> {
    let first = series.rows().first().ok_or_else(|| {
        PureError::Data(ErrorInfo::new(
            "empty-series",
            "cannot derive a baseline from a series without rows",
        ))
    })?;
    let channels = &first[1..];
    Ok(match policy {
        BaselinePolicy::FirstRowRaw => channels.to_vec(),
        BaselinePolicy::FirstRowMean => {
            let mean = channels.iter().sum::<f64>() / channels.len() as f64;
            vec![mean; channels.len()]
        }
    })
}

/// Subtracts `baseline` from every row's channels; time is untouched.
pub fn subtract_baseline(series: &mut TimeSeries, baseline: &[f64]) {
    for row in series.rows_mut() {
        for (value, offset) in row[1..].iter_mut().zip(baseline) {
            *value -= offset;
        }
    }
}

/// Keeps rows with `time <= cutoff_seconds`.
///
/// Fails with `empty-after-truncation` when no row survives.
pub fn truncate(series: &TimeSeries, cutoff_seconds: f64) -> Result<TimeSeries, PureError> {
    let rows: Vec<Vec<f64>> = series
        .rows()
        .iter()
        .filter(|row| row[0] <= cutoff_seconds)
        .cloned()
        .collect();
    if rows.is_empty() {
        return Err(PureError::Data(
            ErrorInfo::new("empty-after-truncation", "no rows at or before the cutoff")
                .with_context("cutoff_seconds", cutoff_seconds.to_string())
                .with_context("rows_before", series.len().to_string())
                .with_hint("raise the cutoff or check the time column units"),
        ));
    }
    TimeSeries::new(series.columns().to_vec(), rows)
}

/// Splits the channels into one table per replicate.
pub fn to_replicates(series: &TimeSeries, measurement: &str) -> Vec<ReplicateTable> {
    let timepoints = series.time();
    series
        .channel_names()
        .iter()
        .enumerate()
        .map(|(offset, channel)| ReplicateTable {
            measurement: measurement.to_string(),
            channel: channel.clone(),
            timepoints: timepoints.clone(),
            values: series.rows().iter().map(|row| row[offset + 1]).collect(),
        })
        .collect()
}

/// Runs the full preprocessing pipeline.
pub fn preprocess(
    mut series: TimeSeries,
    settings: &Preprocessing,
    measurement: &str,
) -> Result<Vec<ReplicateTable>, PureError> {
    let offsets = baseline(&series, settings.baseline)?;
    subtract_baseline(&mut series, &offsets);
    let truncated = truncate(&series, settings.cutoff_seconds)?;
    let replicates = to_replicates(&truncated, measurement);
    info!(
        "preprocessed {} replicates of {} ({} of {} rows kept)",
        replicates.len(),
        measurement,
        truncated.len(),
        series.len()
    );
    Ok(replicates)
}
