//! End-to-end fitting run: data, model, first simulation, sampling, posterior
//! mean, refit simulation, figures and manifest.

use std::collections::BTreeMap;
use std::fs;

use chrono::Utc;
use indexmap::IndexMap;
use log::info;
use pure_core::errors::{ErrorInfo, PureError};
use pure_core::{stable_hash_string, RunProvenance, SchemaVersion};
use pure_crn::ModelDescription;
use pure_data::{load_time_series, preprocess, ReplicateTable};
use pure_plot::{render_corner_svg, render_overlay_svg, write_svg, Curve, FigureConfig};
use serde::{Deserialize, Serialize};

use crate::config::DriverConfig;
use crate::manifest::{DriverOutputs, RunManifest};
use crate::posterior::PosteriorSamples;
use crate::problem::InferenceProblem;
use crate::sampler::Sampler;
use crate::simulate::{Simulator, Trajectory};

/// Result of [`run_driver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverReport {
    /// Files written by the run.
    pub outputs: DriverOutputs,
    /// Trailing-window posterior mean of the estimated parameters.
    pub posterior_mean: IndexMap<String, f64>,
    /// Per-walker acceptance rates reported by the sampler.
    pub acceptance_rates: Vec<f64>,
    /// Rows in the samples file.
    pub rows_written: usize,
}

/// Applies initial concentrations, then the optional parameter scale.
pub fn prepare_model(
    model: &ModelDescription,
    initial: &IndexMap<String, f64>,
    parameter_scale: Option<f64>,
) -> Result<ModelDescription, PureError> {
    let mut prepared = model.clone();
    prepared.set_species(initial)?;
    if let Some(scale) = parameter_scale {
        prepared.scale_parameters(scale);
    }
    Ok(prepared)
}

fn overlay(
    title: &str,
    measurement: &str,
    trajectory: &Trajectory,
    replicates: &[ReplicateTable],
) -> Result<String, PureError> {
    let simulated = Curve::new(
        measurement,
        trajectory.time.clone(),
        trajectory.series(measurement)?.to_vec(),
    );
    let observed: Vec<Curve> = replicates
        .iter()
        .map(|replicate| {
            Curve::new(
                replicate.channel.clone(),
                replicate.timepoints.clone(),
                replicate.values.clone(),
            )
        })
        .collect();
    Ok(render_overlay_svg(
        title,
        &format!("{measurement} (uM)"),
        &simulated,
        &observed,
        &FigureConfig::default(),
    ))
}

fn outputs(config: &DriverConfig) -> DriverOutputs {
    DriverOutputs {
        samples: config.samples_path(),
        simulation_old_csv: config.output_path("simulation_old.csv"),
        simulation_old_svg: config.output_path("simulation_old.svg"),
        simulation_new_csv: config.output_path("simulation_new.csv"),
        simulation_new_svg: config.output_path("simulation_new.svg"),
        corner_plot: config.output_path("corner_plot.svg"),
        manifest: config.output_path("manifest.json"),
    }
}

/// Runs one fit as configured, stopping at the first error.
pub fn run_driver(
    config: &DriverConfig,
    simulator: &dyn Simulator,
    sampler: &dyn Sampler,
) -> Result<DriverReport, PureError> {
    config.validate()?;
    let paths = outputs(config);
    let measurement = config.data.measurement.as_str();

    let columns: Vec<&str> = config.data.columns.iter().map(String::as_str).collect();
    let series = load_time_series(&config.data.path, &columns)?;
    let exp_data = preprocess(series, &config.data.preprocessing, measurement)?;
    let timepoints = exp_data
        .first()
        .map(|replicate| replicate.timepoints.clone())
        .ok_or_else(|| PureError::Data(ErrorInfo::new("no-replicates", "data has no channels")))?;
    info!(
        "{}: {} replicates over {} timepoints",
        config.experiment,
        exp_data.len(),
        timepoints.len()
    );

    let initial = config.initial_conditions.resolve()?;
    let source_model = ModelDescription::load(&config.model)?;
    let model = prepare_model(&source_model, &initial, config.initial_parameter_scale)?;

    fs::create_dir_all(&config.output.directory)
        .map_err(|err| PureError::io("output-mkdir", &config.output.directory, err))?;
    let before = simulator.simulate(&model, &timepoints, config.sampler.sim_type)?;
    before.write_csv(&paths.simulation_old_csv)?;
    write_svg(
        &paths.simulation_old_svg,
        &overlay(
            &format!("{} before fitting", config.experiment),
            measurement,
            &before,
            &exp_data,
        )?,
    )?;
    info!("{}: wrote initial simulation", config.experiment);

    config.priors.require(&config.params_to_estimate)?;
    let problem = InferenceProblem {
        model,
        exp_data,
        measurements: vec![measurement.to_string()],
        params_to_estimate: config.params_to_estimate.clone(),
        prior: config.priors.clone(),
    };
    let outcome = sampler.sample(&problem, simulator, &config.sampler, &paths.samples)?;

    let samples = PosteriorSamples::load(&outcome.samples_path, &config.params_to_estimate)?;
    let posterior_mean = samples.trailing_mean(config.trailing_window)?;
    let rows_averaged = samples.tail(config.trailing_window).len();
    info!(
        "{}: posterior mean over {rows_averaged} rows: {posterior_mean:?}",
        config.experiment
    );

    let mut refit = ModelDescription::load(&config.model)?;
    for (name, value) in &posterior_mean {
        refit.set_parameter(name, *value)?;
    }
    refit.set_species(&initial)?;
    let after = simulator.simulate(&refit, &timepoints, config.sampler.sim_type)?;
    after.write_csv(&paths.simulation_new_csv)?;
    write_svg(
        &paths.simulation_new_svg,
        &overlay(
            &format!("{} at posterior mean", config.experiment),
            measurement,
            &after,
            &problem.exp_data,
        )?,
    )?;

    write_svg(
        &paths.corner_plot,
        &render_corner_svg(samples.names(), samples.rows(), &FigureConfig::default()),
    )?;

    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    let provenance = RunProvenance {
        schema: SchemaVersion::default(),
        config_hash: stable_hash_string(config)?,
        model_hash: source_model.canonical_hash()?,
        data_hash: stable_hash_string(&problem.exp_data)?,
        seed: config.sampler.seed,
        created_at: Utc::now().to_rfc3339(),
        tool_versions,
    };
    let manifest = RunManifest {
        config: config.clone(),
        provenance,
        outputs: paths.clone(),
        acceptance_rates: outcome.acceptance_rates.clone(),
        rows_written: outcome.rows_written,
        rows_averaged,
        posterior_mean: posterior_mean.clone(),
    };
    manifest.write(&paths.manifest)?;
    info!(
        "{}: finished, manifest at {}",
        config.experiment,
        paths.manifest.display()
    );

    Ok(DriverReport {
        outputs: paths,
        posterior_mean,
        acceptance_rates: outcome.acceptance_rates,
        rows_written: outcome.rows_written,
    })
}
