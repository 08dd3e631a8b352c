use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};
use pure_crn::ModelDescription;
use serde::{Deserialize, Serialize};

/// Simulation semantics requested from a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimType {
    /// Mass-action ordinary differential equations.
    #[default]
    Deterministic,
    /// Stochastic simulation of molecule counts.
    Stochastic,
}

impl SimType {
    /// Lower-case name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimType::Deterministic => "deterministic",
            SimType::Stochastic => "stochastic",
        }
    }
}

impl fmt::Display for SimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Species concentrations sampled at the requested timepoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Output times in seconds.
    pub time: Vec<f64>,
    /// One series per model species, in model order.
    pub species: IndexMap<String, Vec<f64>>,
}

impl Trajectory {
    /// Number of output rows.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the trajectory has no rows.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Series of one species.
    pub fn series(&self, name: &str) -> Result<&[f64], PureError> {
        self.species.get(name).map(Vec::as_slice).ok_or_else(|| {
            PureError::Simulation(
                ErrorInfo::new("unknown-species", format!("trajectory has no species {name}"))
                    .with_context("species", name),
            )
        })
    }

    /// Writes `time,<species...>` with one row per output time.
    pub fn write_csv(&self, path: &Path) -> Result<(), PureError> {
        let wrap = |err: csv::Error| {
            PureError::Serde(ErrorInfo::new("trajectory-write", err.to_string()).with_path(path))
        };
        let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
        let mut header = vec!["time".to_string()];
        header.extend(self.species.keys().cloned());
        writer.write_record(&header).map_err(wrap)?;
        for (row, time) in self.time.iter().enumerate() {
            let mut record = vec![time.to_string()];
            record.extend(self.species.values().map(|series| series[row].to_string()));
            writer.write_record(&record).map_err(wrap)?;
        }
        writer
            .flush()
            .map_err(|err| PureError::io("trajectory-write", path, err))
    }
}

/// Backend that integrates a model description over time.
///
/// Implementations must be deterministic for [`SimType::Deterministic`]:
/// identical model, timepoints and type give identical trajectories.
pub trait Simulator {
    /// Simulates `model` from its current species values, which are taken as
    /// the state at `timepoints[0]`.
    fn simulate(
        &self,
        model: &ModelDescription,
        timepoints: &[f64],
        sim_type: SimType,
    ) -> Result<Trajectory, PureError>;
}

impl<S: Simulator + ?Sized> Simulator for &S {
    fn simulate(
        &self,
        model: &ModelDescription,
        timepoints: &[f64],
        sim_type: SimType,
    ) -> Result<Trajectory, PureError> {
        (**self).simulate(model, timepoints, sim_type)
    }
}
