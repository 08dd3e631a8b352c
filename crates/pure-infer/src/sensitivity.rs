//! Normalized local sensitivities `S = (p / y) · ∂y/∂p` of one species to
//! every model parameter, by central finite differences.

use std::path::Path;

use log::info;
use pure_core::errors::{ErrorInfo, PureError};
use pure_crn::ModelDescription;
use serde::{Deserialize, Serialize};

use crate::simulate::{SimType, Simulator};

/// Default relative perturbation of each parameter.
pub const DEFAULT_RELATIVE_STEP: f64 = 1e-4;

/// Sensitivity of one species, one row per parameter and one column per
/// timepoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityMatrix {
    /// Species whose response is measured.
    pub species: String,
    /// Row labels.
    pub parameters: Vec<String>,
    /// Column times in seconds.
    pub timepoints: Vec<f64>,
    /// `values[row][col]`.
    pub values: Vec<Vec<f64>>,
}

impl SensitivityMatrix {
    /// Sensitivity row of one parameter.
    pub fn row(&self, parameter: &str) -> Option<&[f64]> {
        let index = self.parameters.iter().position(|name| name == parameter)?;
        Some(&self.values[index])
    }

    /// Writes `parameter,<t0>,<t1>,...` followed by one row per parameter.
    pub fn write_csv(&self, path: &Path) -> Result<(), PureError> {
        let wrap = |err: csv::Error| {
            PureError::Serde(ErrorInfo::new("sensitivity-write", err.to_string()).with_path(path))
        };
        let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
        let mut header = vec!["parameter".to_string()];
        header.extend(self.timepoints.iter().map(|t| t.to_string()));
        writer.write_record(&header).map_err(wrap)?;
        for (name, row) in self.parameters.iter().zip(&self.values) {
            let mut record = vec![name.clone()];
            record.extend(row.iter().map(|value| value.to_string()));
            writer.write_record(&record).map_err(wrap)?;
        }
        writer
            .flush()
            .map_err(|err| PureError::io("sensitivity-write", path, err))
    }
}

fn perturbed(
    model: &ModelDescription,
    name: &str,
    value: f64,
) -> Result<ModelDescription, PureError> {
    let mut copy = model.clone();
    copy.set_parameter(name, value)?;
    Ok(copy)
}

/// Sensitivity of `species` to every parameter of `model`.
///
/// Entries where the species value is zero, or where the parameter itself is
/// zero, are reported as zero.
pub fn normalized_sensitivity<S: Simulator + ?Sized>(
    simulator: &S,
    model: &ModelDescription,
    species: &str,
    timepoints: &[f64],
    relative_step: f64,
) -> Result<SensitivityMatrix, PureError> {
    if !(relative_step.is_finite() && relative_step > 0.0 && relative_step < 1.0) {
        return Err(PureError::Validation(
            ErrorInfo::new("sensitivity-step", "relative step must lie in (0, 1)")
                .with_context("relative_step", relative_step.to_string()),
        ));
    }
    let base = simulator.simulate(model, timepoints, SimType::Deterministic)?;
    let baseline = base.series(species)?.to_vec();

    let mut parameters = Vec::with_capacity(model.parameters().len());
    let mut values = Vec::with_capacity(model.parameters().len());
    for (name, &value) in model.parameters() {
        parameters.push(name.clone());
        if value == 0.0 {
            values.push(vec![0.0; timepoints.len()]);
            continue;
        }
        let step = relative_step * value.abs();
        let upper = simulator.simulate(
            &perturbed(model, name, value + step)?,
            timepoints,
            SimType::Deterministic,
        )?;
        let lower = simulator.simulate(
            &perturbed(model, name, value - step)?,
            timepoints,
            SimType::Deterministic,
        )?;
        let row = baseline
            .iter()
            .zip(upper.series(species)?)
            .zip(lower.series(species)?)
            .map(|((y, up), down)| {
                if *y == 0.0 {
                    0.0
                } else {
                    value / y * (up - down) / (2.0 * step)
                }
            })
            .collect();
        values.push(row);
    }
    info!(
        "computed sensitivities of {species} to {} parameters at {} timepoints",
        parameters.len(),
        timepoints.len()
    );
    Ok(SensitivityMatrix {
        species: species.to_string(),
        parameters,
        timepoints: timepoints.to_vec(),
        values,
    })
}
