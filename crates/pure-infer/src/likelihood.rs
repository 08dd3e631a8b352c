use pure_core::errors::PureError;
use pure_crn::ModelDescription;
use pure_data::ReplicateTable;

use crate::simulate::{SimType, Simulator, Trajectory};

/// `-0.5 Σ ((y - ŷ)/σ)²` over paired observations and predictions.
pub fn gaussian_log_likelihood(observed: &[f64], predicted: &[f64], sigma: f64) -> f64 {
    let sum: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, y_hat)| ((y - y_hat) / sigma).powi(2))
        .sum();
    let value = -0.5 * sum;
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}

/// Gaussian log likelihood of every replicate under `model`.
///
/// Replicates sharing their timepoints reuse one simulation. Simulation
/// failures are returned to the caller.
pub fn log_likelihood<S: Simulator + ?Sized>(
    simulator: &S,
    model: &ModelDescription,
    exp_data: &[ReplicateTable],
    sim_type: SimType,
    sigma: f64,
) -> Result<f64, PureError> {
    let mut cached: Option<(&[f64], Trajectory)> = None;
    let mut total = 0.0;
    for replicate in exp_data {
        let reuse = matches!(&cached, Some((times, _)) if *times == replicate.timepoints.as_slice());
        if !reuse {
            let trajectory = simulator.simulate(model, &replicate.timepoints, sim_type)?;
            cached = Some((replicate.timepoints.as_slice(), trajectory));
        }
        if let Some((_, trajectory)) = &cached {
            let predicted = trajectory.series(&replicate.measurement)?;
            total += gaussian_log_likelihood(&replicate.values, predicted, sigma);
        }
    }
    Ok(total)
}
