pub mod build_model;
pub mod corner;
pub mod infer;
pub mod sensitivity;
pub mod simulate;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use indexmap::IndexMap;
use pure_crn::ModelDescription;
use pure_data::load_initial_conditions;
use pure_infer::{IntegratorSettings, MassActionSimulator};

/// Parses `NAME=VALUE` pairs given on the command line.
pub fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((name.trim().to_string(), value))
}

/// Evenly spaced output times from 0 to `end` inclusive.
pub fn linspace(end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..points)
            .map(|i| end * i as f64 / (points - 1) as f64)
            .collect(),
    }
}

/// Model loading shared by the simulation commands.
#[derive(Args, Debug)]
pub struct ModelInput {
    /// Model description JSON produced by `build-model`.
    #[arg(long)]
    pub model: PathBuf,
    /// Headerless `species,value` file of initial concentrations.
    #[arg(long = "initial-csv")]
    pub initial_csv: Option<PathBuf>,
    /// Initial concentration applied after the CSV, as NAME=VALUE.
    #[arg(long = "set", value_parser = parse_assignment)]
    pub overrides: Vec<(String, f64)>,
    /// Factor applied to every parameter.
    #[arg(long)]
    pub scale: Option<f64>,
}

impl ModelInput {
    pub fn load(&self) -> Result<ModelDescription, Box<dyn Error>> {
        let model = ModelDescription::load(&self.model)?;
        let mut initial = IndexMap::new();
        if let Some(path) = &self.initial_csv {
            initial.extend(load_initial_conditions(path)?);
        }
        initial.extend(self.overrides.iter().cloned());
        Ok(pure_infer::prepare_model(&model, &initial, self.scale)?)
    }
}

/// Output grid shared by the simulation commands.
#[derive(Args, Debug)]
pub struct TimeGrid {
    /// Final time in hours.
    #[arg(long, default_value_t = 3.0)]
    pub hours: f64,
    /// Number of evenly spaced output times, including 0.
    #[arg(long, default_value_t = 181)]
    pub points: usize,
}

impl TimeGrid {
    pub fn timepoints(&self) -> Vec<f64> {
        linspace(pure_data::hours(self.hours), self.points)
    }
}

/// Integrator step control, mirroring the `integrator` section of a driver
/// configuration.
#[derive(Args, Debug)]
pub struct SolverArgs {
    /// Relative tolerance.
    #[arg(long)]
    pub rtol: Option<f64>,
    /// Absolute tolerance.
    #[arg(long)]
    pub atol: Option<f64>,
    /// First trial step in seconds.
    #[arg(long = "initial-step")]
    pub initial_step: Option<f64>,
    /// Largest step in seconds.
    #[arg(long = "max-step")]
    pub max_step: Option<f64>,
    /// Steps allowed between two output times.
    #[arg(long = "max-steps")]
    pub max_steps: Option<u32>,
}

impl SolverArgs {
    pub fn settings(&self) -> IntegratorSettings {
        let defaults = IntegratorSettings::default();
        IntegratorSettings {
            rtol: self.rtol.unwrap_or(defaults.rtol),
            atol: self.atol.unwrap_or(defaults.atol),
            initial_step: self.initial_step.or(defaults.initial_step),
            max_step: self.max_step.or(defaults.max_step),
            max_steps: self.max_steps.unwrap_or(defaults.max_steps),
        }
    }

    pub fn simulator(&self) -> MassActionSimulator {
        MassActionSimulator::new(self.settings())
    }
}
