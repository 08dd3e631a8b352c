#![deny(missing_docs)]
#![doc = "Simulation, Bayesian parameter inference and sensitivity analysis for PURE transcription models."]

/// YAML driver configuration.
pub mod config;
pub mod driver;
pub mod integrator;
/// Gaussian measurement likelihood.
pub mod likelihood;
/// Run manifest serialization.
pub mod manifest;
/// Trailing-window summaries of reloaded samples.
pub mod posterior;
/// Prior families and prior sets.
pub mod prior;
/// Inference problem definition.
pub mod problem;
/// Sampler seam and the random-walk Metropolis ensemble.
pub mod sampler;
pub mod sensitivity;
/// Simulator seam and trajectories.
pub mod simulate;

pub use config::{DataConfig, DriverConfig, InitialConditions, OutputConfig, DEFAULT_SAMPLES_FILE};
pub use driver::{prepare_model, run_driver, DriverReport};
pub use integrator::{IntegratorSettings, MassActionSimulator};
pub use likelihood::{gaussian_log_likelihood, log_likelihood};
pub use manifest::{DriverOutputs, RunManifest};
pub use posterior::{PosteriorSamples, DEFAULT_TRAILING_WINDOW};
pub use prior::{PriorFamily, PriorSet, PriorSpec};
pub use problem::InferenceProblem;
pub use sampler::{
    walker_seed, InitSeed, MetropolisEnsemble, Sampler, SamplerOutcome, SamplerSettings,
};
pub use sensitivity::{normalized_sensitivity, SensitivityMatrix, DEFAULT_RELATIVE_STEP};
pub use simulate::{SimType, Simulator, Trajectory};
