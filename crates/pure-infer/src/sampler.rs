use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use pure_core::errors::{ErrorInfo, PureError};
use pure_core::{derive_substream_seed, RngHandle};
use serde::{Deserialize, Serialize};

use crate::problem::InferenceProblem;
use crate::prior::PriorSpec;
use crate::simulate::{SimType, Simulator};

/// Starting positions tried per walker before giving up.
pub const MAX_INIT_ATTEMPTS: usize = 1_000;

/// How walker starting positions are chosen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSeed {
    /// Independent draws from the priors.
    #[default]
    Prior,
    /// Model values perturbed by a relative Gaussian jitter.
    Jitter {
        /// Relative standard deviation of the perturbation.
        fraction: f64,
    },
}

fn default_nwalkers() -> usize {
    30
}

fn default_nsteps() -> usize {
    500
}

fn default_proposal_scale() -> f64 {
    0.1
}

fn default_noise_sigma() -> f64 {
    1.0
}

fn default_thin() -> usize {
    1
}

/// Sampler configuration shared by every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerSettings {
    /// Number of independent walkers.
    #[serde(default = "default_nwalkers")]
    pub nwalkers: usize,
    /// Steps taken by each walker.
    #[serde(default = "default_nsteps")]
    pub nsteps: usize,
    /// Starting position policy.
    #[serde(default)]
    pub init_seed: InitSeed,
    /// Simulation semantics used by the likelihood.
    #[serde(default)]
    pub sim_type: SimType,
    /// Master seed; walker streams are derived from it.
    #[serde(default)]
    pub seed: u64,
    /// Proposal width as a multiple of each prior's width.
    #[serde(default = "default_proposal_scale")]
    pub proposal_scale: f64,
    /// Measurement noise standard deviation of the likelihood.
    #[serde(default = "default_noise_sigma")]
    pub noise_sigma: f64,
    /// Leading steps left out of the samples file.
    #[serde(default)]
    pub discard: usize,
    /// Only every `thin`-th retained step is written.
    #[serde(default = "default_thin")]
    pub thin: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            nwalkers: default_nwalkers(),
            nsteps: default_nsteps(),
            init_seed: InitSeed::default(),
            sim_type: SimType::default(),
            seed: 0,
            proposal_scale: default_proposal_scale(),
            noise_sigma: default_noise_sigma(),
            discard: 0,
            thin: default_thin(),
        }
    }
}

fn settings_error(field: &str, message: &str) -> PureError {
    PureError::Validation(
        ErrorInfo::new("sampler-settings", message.to_string()).with_context("field", field),
    )
}

impl SamplerSettings {
    /// Rejects settings that would produce no usable samples.
    pub fn validate(&self) -> Result<(), PureError> {
        if self.nwalkers == 0 {
            return Err(settings_error("nwalkers", "at least one walker is required"));
        }
        if self.nsteps == 0 {
            return Err(settings_error("nsteps", "at least one step is required"));
        }
        if self.thin == 0 {
            return Err(settings_error("thin", "thin must be at least 1"));
        }
        if self.discard >= self.nsteps {
            return Err(settings_error("discard", "discard must be smaller than nsteps"));
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma > 0.0) {
            return Err(settings_error("noise_sigma", "noise_sigma must be positive"));
        }
        if !(self.proposal_scale.is_finite() && self.proposal_scale > 0.0) {
            return Err(settings_error("proposal_scale", "proposal_scale must be positive"));
        }
        if let InitSeed::Jitter { fraction } = self.init_seed {
            if !(fraction.is_finite() && fraction >= 0.0) {
                return Err(settings_error("init_seed", "jitter fraction must be non-negative"));
            }
        }
        Ok(())
    }

    /// Number of rows a completed run writes.
    pub fn expected_rows(&self) -> usize {
        let kept = self.nsteps - self.discard.min(self.nsteps);
        kept.div_ceil(self.thin.max(1)) * self.nwalkers
    }
}

/// Summary of a completed sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerOutcome {
    /// Accepted fraction of proposals, one entry per walker.
    pub acceptance_rates: Vec<f64>,
    /// File the raw samples were written to.
    pub samples_path: PathBuf,
    /// Rows written to the samples file.
    pub rows_written: usize,
    /// The written rows in file order, as held in memory.
    #[serde(skip)]
    pub chain: Vec<Vec<f64>>,
}

impl SamplerOutcome {
    /// Mean acceptance across walkers.
    pub fn mean_acceptance(&self) -> f64 {
        if self.acceptance_rates.is_empty() {
            return 0.0;
        }
        self.acceptance_rates.iter().sum::<f64>() / self.acceptance_rates.len() as f64
    }
}

/// Posterior sampling backend.
///
/// The call blocks until sampling completes. Raw samples are written to
/// `out` as a headerless CSV with one column per estimated parameter, in
/// `params_to_estimate` order.
pub trait Sampler {
    /// Samples the posterior of `problem`.
    fn sample(
        &self,
        problem: &InferenceProblem,
        simulator: &dyn Simulator,
        settings: &SamplerSettings,
        out: &Path,
    ) -> Result<SamplerOutcome, PureError>;
}

/// Deterministic seed of one walker's stream.
pub fn walker_seed(master_seed: u64, walker: usize) -> u64 {
    derive_substream_seed(master_seed, walker as u64)
}

/// Ensemble of independent random-walk Metropolis walkers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetropolisEnsemble;

struct Walker {
    rng: RngHandle,
    position: Vec<f64>,
    log_prior: f64,
    log_likelihood: f64,
    accepted: usize,
    proposed: usize,
}

impl Walker {
    fn log_posterior(&self) -> f64 {
        self.log_prior + self.log_likelihood
    }

    fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// Log prior and log likelihood of a position; simulation failures score
/// `-inf` so the position is rejected.
fn evaluate(
    problem: &InferenceProblem,
    simulator: &dyn Simulator,
    settings: &SamplerSettings,
    position: &[f64],
) -> Result<(f64, f64), PureError> {
    let log_prior = problem.log_prior(position)?;
    if !log_prior.is_finite() {
        return Ok((log_prior, f64::NEG_INFINITY));
    }
    let log_likelihood = match problem.log_likelihood(
        simulator,
        position,
        settings.sim_type,
        settings.noise_sigma,
    ) {
        Ok(value) => value,
        Err(err) => {
            debug!("rejecting position {position:?}: {err}");
            f64::NEG_INFINITY
        }
    };
    Ok((log_prior, log_likelihood))
}

fn start_position(
    rng: &mut RngHandle,
    init_seed: &InitSeed,
    priors: &[&PriorSpec],
    initial: &[f64],
) -> Result<Vec<f64>, PureError> {
    match init_seed {
        InitSeed::Prior => priors.iter().map(|prior| prior.draw(rng)).collect(),
        InitSeed::Jitter { fraction } => Ok(initial
            .iter()
            .zip(priors)
            .map(|(value, prior)| {
                let noise = fraction * rng.standard_normal();
                if *value == 0.0 {
                    noise * prior.width()
                } else {
                    value * (1.0 + noise)
                }
            })
            .collect()),
    }
}

fn write_error(path: &Path, err: csv::Error) -> PureError {
    PureError::Serde(ErrorInfo::new("samples-write", err.to_string()).with_path(path))
}

impl Sampler for MetropolisEnsemble {
    fn sample(
        &self,
        problem: &InferenceProblem,
        simulator: &dyn Simulator,
        settings: &SamplerSettings,
        out: &Path,
    ) -> Result<SamplerOutcome, PureError> {
        settings.validate()?;
        problem.validate()?;
        let priors = problem.prior.require(&problem.params_to_estimate)?;
        let widths: Vec<f64> = priors
            .iter()
            .map(|prior| prior.width() * settings.proposal_scale)
            .collect();
        let initial = problem.initial_values()?;
        // The unperturbed model must simulate; its failure is a setup error.
        problem.log_likelihood(simulator, &initial, settings.sim_type, settings.noise_sigma)?;

        let mut walkers = Vec::with_capacity(settings.nwalkers);
        for index in 0..settings.nwalkers {
            let mut rng = RngHandle::from_seed(walker_seed(settings.seed, index));
            let mut start = None;
            for _ in 0..MAX_INIT_ATTEMPTS {
                let position = start_position(&mut rng, &settings.init_seed, &priors, &initial)?;
                let (log_prior, log_likelihood) = evaluate(problem, simulator, settings, &position)?;
                if (log_prior + log_likelihood).is_finite() {
                    start = Some((position, log_prior, log_likelihood));
                    break;
                }
            }
            let (position, log_prior, log_likelihood) = start.ok_or_else(|| {
                PureError::Inference(
                    ErrorInfo::new("init-failed", "no starting position with finite posterior")
                        .with_context("walker", index.to_string())
                        .with_context("attempts", MAX_INIT_ATTEMPTS.to_string()),
                )
            })?;
            walkers.push(Walker {
                rng,
                position,
                log_prior,
                log_likelihood,
                accepted: 0,
                proposed: 0,
            });
        }

        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| PureError::io("samples-mkdir", parent, err))?;
            }
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(out)
            .map_err(|err| write_error(out, err))?;

        let mut chain: Vec<Vec<f64>> = Vec::with_capacity(settings.expected_rows());
        for step in 0..settings.nsteps {
            let mut accepted_this_step = 0;
            for walker in &mut walkers {
                let mut proposal = Vec::with_capacity(widths.len());
                for (value, width) in walker.position.iter().zip(&widths) {
                    proposal.push(value + width * walker.rng.standard_normal());
                }
                let (log_prior, log_likelihood) = evaluate(problem, simulator, settings, &proposal)?;
                let delta = (log_prior + log_likelihood) - walker.log_posterior();
                let acceptance = if delta.is_nan() { 0.0 } else { delta.exp().min(1.0) };
                let draw = walker.rng.acceptance_draw();
                walker.proposed += 1;
                if draw < acceptance {
                    walker.accepted += 1;
                    accepted_this_step += 1;
                    walker.position = proposal;
                    walker.log_prior = log_prior;
                    walker.log_likelihood = log_likelihood;
                }
            }
            debug!(
                "step {step}: {accepted_this_step}/{} proposals accepted",
                walkers.len()
            );
            if step >= settings.discard && (step - settings.discard) % settings.thin == 0 {
                for walker in &walkers {
                    writer
                        .write_record(walker.position.iter().map(|value| value.to_string()))
                        .map_err(|err| write_error(out, err))?;
                    chain.push(walker.position.clone());
                }
            }
        }
        writer
            .flush()
            .map_err(|err| PureError::io("samples-write", out, err))?;

        let outcome = SamplerOutcome {
            acceptance_rates: walkers.iter().map(Walker::acceptance_rate).collect(),
            samples_path: out.to_path_buf(),
            rows_written: chain.len(),
            chain,
        };
        info!(
            "sampled {} walkers x {} steps, mean acceptance {:.3}, {} rows in {}",
            settings.nwalkers,
            settings.nsteps,
            outcome.mean_acceptance(),
            outcome.rows_written,
            out.display()
        );
        Ok(outcome)
    }
}
