use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};
use pure_data::{load_initial_conditions, Preprocessing};
use serde::{Deserialize, Serialize};

use crate::integrator::IntegratorSettings;
use crate::posterior::DEFAULT_TRAILING_WINDOW;
use crate::prior::PriorSet;
use crate::sampler::SamplerSettings;

/// Default name of the raw samples file.
pub const DEFAULT_SAMPLES_FILE: &str = "mcmc_results.csv";

fn default_measurement() -> String {
    "mRNA".to_string()
}

fn default_trailing_window() -> usize {
    DEFAULT_TRAILING_WINDOW
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_samples_file() -> String {
    DEFAULT_SAMPLES_FILE.to_string()
}

/// Experimental data source and its preprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Delimited time series; the header line is skipped.
    pub path: PathBuf,
    /// Column names, time first, then one per replicate channel.
    pub columns: Vec<String>,
    /// Model species the replicate channels measure.
    #[serde(default = "default_measurement")]
    pub measurement: String,
    /// Baseline policy and cutoff.
    #[serde(default)]
    pub preprocessing: Preprocessing,
}

/// Initial concentrations applied to the model before simulating.
///
/// Layers are applied in order: inline `values`, then the optional
/// two-column `csv`, then `overrides`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialConditions {
    /// Inline concentrations.
    #[serde(default)]
    pub values: IndexMap<String, f64>,
    /// Headerless `species,value` file.
    #[serde(default)]
    pub csv: Option<PathBuf>,
    /// Concentrations forced after everything else.
    #[serde(default)]
    pub overrides: IndexMap<String, f64>,
}

impl InitialConditions {
    /// Merged concentrations, later layers winning.
    pub fn resolve(&self) -> Result<IndexMap<String, f64>, PureError> {
        let mut merged = self.values.clone();
        if let Some(path) = &self.csv {
            merged.extend(load_initial_conditions(path)?);
        }
        merged.extend(self.overrides.iter().map(|(name, value)| (name.clone(), *value)));
        Ok(merged)
    }
}

/// Where run artefacts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created on demand.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// File name of the raw samples inside `directory`.
    #[serde(default = "default_samples_file")]
    pub samples_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            samples_file: default_samples_file(),
        }
    }
}

/// Complete description of one inference run, loaded once from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Prefix of every output file.
    pub experiment: String,
    /// Experimental data.
    pub data: DataConfig,
    /// Model description JSON.
    pub model: PathBuf,
    /// Initial concentrations.
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    /// Factor applied to every model parameter before fitting.
    #[serde(default)]
    pub initial_parameter_scale: Option<f64>,
    /// Estimated parameters, in samples-file column order.
    pub params_to_estimate: Vec<String>,
    /// Prior of every estimated parameter.
    pub priors: PriorSet,
    /// Sampler settings.
    #[serde(default)]
    pub sampler: SamplerSettings,
    /// Step control of the bundled simulator.
    #[serde(default)]
    pub integrator: IntegratorSettings,
    /// Rows averaged for the posterior mean.
    #[serde(default = "default_trailing_window")]
    pub trailing_window: usize,
    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,
}

fn config_error(field: &str, message: &str) -> PureError {
    PureError::Validation(ErrorInfo::new("driver-config", message).with_context("field", field))
}

fn rebase(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

impl DriverConfig {
    /// Reads a YAML configuration. Relative paths are taken relative to the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, PureError> {
        let contents =
            fs::read_to_string(path).map_err(|err| PureError::io("config-read", path, err))?;
        let mut config: DriverConfig = serde_yaml::from_str(&contents).map_err(|err| {
            PureError::Serde(ErrorInfo::new("config-parse", err.to_string()).with_path(path))
        })?;
        if let Some(base) = path.parent() {
            config.rebase_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Joins every relative path onto `base`.
    pub fn rebase_paths(&mut self, base: &Path) {
        rebase(base, &mut self.data.path);
        rebase(base, &mut self.model);
        if let Some(csv) = self.initial_conditions.csv.as_mut() {
            rebase(base, csv);
        }
        rebase(base, &mut self.output.directory);
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), PureError> {
        if self.experiment.trim().is_empty() {
            return Err(config_error("experiment", "experiment name must not be empty"));
        }
        if self.data.columns.len() < 2 {
            return Err(config_error(
                "data.columns",
                "columns must name time and at least one replicate",
            ));
        }
        if self.params_to_estimate.is_empty() {
            return Err(config_error("params_to_estimate", "nothing to estimate"));
        }
        if self.trailing_window == 0 {
            return Err(config_error("trailing_window", "trailing window must be at least 1"));
        }
        if let Some(scale) = self.initial_parameter_scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(config_error(
                    "initial_parameter_scale",
                    "scale must be finite and positive",
                ));
            }
        }
        self.sampler.validate()
    }

    /// Path of the raw samples file.
    pub fn samples_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.samples_file)
    }

    /// Path of an output artefact named `<experiment>_<suffix>`.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.output
            .directory
            .join(format!("{}_{suffix}", self.experiment))
    }
}
