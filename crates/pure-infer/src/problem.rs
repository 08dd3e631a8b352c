use pure_core::errors::{ErrorInfo, PureError};
use pure_crn::ModelDescription;
use pure_data::ReplicateTable;

use crate::likelihood::log_likelihood;
use crate::prior::PriorSet;
use crate::simulate::{SimType, Simulator};

/// Everything a sampler needs to evaluate the posterior.
#[derive(Debug, Clone)]
pub struct InferenceProblem {
    /// Model whose current values are the starting point.
    pub model: ModelDescription,
    /// Replicate trajectories, one table per replicate.
    pub exp_data: Vec<ReplicateTable>,
    /// Model species compared against the data.
    pub measurements: Vec<String>,
    /// Estimated parameters; also the column order of the samples file.
    pub params_to_estimate: Vec<String>,
    /// Prior for every estimated parameter.
    pub prior: PriorSet,
}

fn inference_error(code: &str, message: impl Into<String>) -> PureError {
    PureError::Inference(ErrorInfo::new(code, message))
}

impl InferenceProblem {
    /// Checks that parameters, measurements, priors and data line up.
    pub fn validate(&self) -> Result<(), PureError> {
        if self.params_to_estimate.is_empty() {
            return Err(inference_error("no-parameters", "no parameters to estimate"));
        }
        if self.exp_data.is_empty() {
            return Err(inference_error("no-data", "no experimental replicates supplied"));
        }
        for name in &self.params_to_estimate {
            self.model.parameter(name)?;
        }
        for species in &self.measurements {
            self.model.species_value(species)?;
        }
        self.prior.require(&self.params_to_estimate)?;
        for replicate in &self.exp_data {
            if !self.measurements.contains(&replicate.measurement) {
                return Err(PureError::Inference(
                    ErrorInfo::new(
                        "unmeasured-replicate",
                        format!(
                            "replicate measures {} which is not a measurement",
                            replicate.measurement
                        ),
                    )
                    .with_context("channel", replicate.channel.clone()),
                ));
            }
            if replicate.timepoints.len() != replicate.values.len() || replicate.is_empty() {
                return Err(PureError::Inference(
                    ErrorInfo::new("replicate-shape", "replicate needs matching, non-empty columns")
                        .with_context("channel", replicate.channel.clone()),
                ));
            }
        }
        Ok(())
    }

    /// Current model values of the estimated parameters.
    pub fn initial_values(&self) -> Result<Vec<f64>, PureError> {
        self.params_to_estimate
            .iter()
            .map(|name| self.model.parameter(name))
            .collect()
    }

    /// Copy of the model with the estimated parameters set to `values`.
    pub fn model_at(&self, values: &[f64]) -> Result<ModelDescription, PureError> {
        let mut model = self.model.clone();
        for (name, value) in self.params_to_estimate.iter().zip(values) {
            model.set_parameter(name, *value)?;
        }
        Ok(model)
    }

    /// Sum of the prior log densities.
    pub fn log_prior(&self, values: &[f64]) -> Result<f64, PureError> {
        let priors = self.prior.require(&self.params_to_estimate)?;
        let mut total = 0.0;
        for (prior, value) in priors.iter().zip(values) {
            total += prior.log_density(*value)?;
        }
        Ok(total)
    }

    /// Gaussian log likelihood of the data at `values`.
    pub fn log_likelihood<S: Simulator + ?Sized>(
        &self,
        simulator: &S,
        values: &[f64],
        sim_type: SimType,
        noise_sigma: f64,
    ) -> Result<f64, PureError> {
        let model = self.model_at(values)?;
        log_likelihood(simulator, &model, &self.exp_data, sim_type, noise_sigma)
    }
}
