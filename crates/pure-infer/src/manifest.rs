use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pure_core::errors::PureError;
use pure_core::{read_json, write_json, RunProvenance};
use serde::{Deserialize, Serialize};

use crate::config::DriverConfig;

/// Files produced by one driver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverOutputs {
    /// Raw samples written by the sampler.
    pub samples: PathBuf,
    /// Trajectory before fitting.
    pub simulation_old_csv: PathBuf,
    /// Overlay figure before fitting.
    pub simulation_old_svg: PathBuf,
    /// Trajectory at the posterior mean.
    pub simulation_new_csv: PathBuf,
    /// Overlay figure at the posterior mean.
    pub simulation_new_svg: PathBuf,
    /// Posterior corner plot.
    pub corner_plot: PathBuf,
    /// This manifest.
    pub manifest: PathBuf,
}

/// Structured record of a completed driver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run.
    pub config: DriverConfig,
    /// Hashes, seed and timestamp.
    pub provenance: RunProvenance,
    /// Output files.
    pub outputs: DriverOutputs,
    /// Per-walker acceptance rates.
    pub acceptance_rates: Vec<f64>,
    /// Rows written to the samples file.
    pub rows_written: usize,
    /// Rows the posterior mean was computed from.
    pub rows_averaged: usize,
    /// Trailing-window posterior mean.
    pub posterior_mean: IndexMap<String, f64>,
}

impl RunManifest {
    /// Writes the manifest as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<(), PureError> {
        write_json(path, self)
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, PureError> {
        let manifest: RunManifest = read_json(path)?;
        manifest.provenance.schema.ensure_readable()?;
        Ok(manifest)
    }
}
