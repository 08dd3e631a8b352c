mod common;

use std::fs;

use pure_infer::{
    InferenceProblem, InitSeed, MassActionSimulator, MetropolisEnsemble, PosteriorSamples,
    PriorSet, PriorSpec, Sampler, SamplerSettings,
};
use tempfile::tempdir;

use common::{decay_model, decay_replicates};

fn problem() -> InferenceProblem {
    let timepoints = [0.0, 0.5, 1.0, 2.0, 4.0];
    InferenceProblem {
        model: decay_model(),
        exp_data: decay_replicates(&timepoints, &[0.0, 0.05, -0.05]),
        measurements: vec!["mRNA".to_string()],
        params_to_estimate: vec!["k".to_string()],
        prior: PriorSet::new().with("k", PriorSpec::gaussian(0.4, 0.2).positive()),
    }
}

fn settings(seed: u64) -> SamplerSettings {
    SamplerSettings {
        nwalkers: 4,
        nsteps: 25,
        seed,
        noise_sigma: 0.1,
        ..SamplerSettings::default()
    }
}

#[test]
fn samples_file_has_one_row_per_walker_step() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mcmc_results.csv");
    let simulator = MassActionSimulator::default();
    let outcome = MetropolisEnsemble
        .sample(&problem(), &simulator, &settings(11), &out)
        .unwrap();

    assert_eq!(outcome.rows_written, 100);
    assert_eq!(outcome.samples_path, out);
    assert_eq!(outcome.acceptance_rates.len(), 4);
    assert!(outcome
        .acceptance_rates
        .iter()
        .all(|rate| (0.0..=1.0).contains(rate)));

    let contents = fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().count(), 100);
    let samples = PosteriorSamples::load(&out, &["k".to_string()]).unwrap();
    assert!(samples.column("k").unwrap().iter().all(|k| *k > 0.0));
}

#[test]
fn same_seed_reproduces_the_samples_file() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.csv");
    let second = dir.path().join("b.csv");
    let third = dir.path().join("c.csv");
    let simulator = MassActionSimulator::default();
    MetropolisEnsemble
        .sample(&problem(), &simulator, &settings(3), &first)
        .unwrap();
    MetropolisEnsemble
        .sample(&problem(), &simulator, &settings(3), &second)
        .unwrap();
    MetropolisEnsemble
        .sample(&problem(), &simulator, &settings(4), &third)
        .unwrap();
    let a = fs::read(&first).unwrap();
    assert_eq!(a, fs::read(&second).unwrap());
    assert_ne!(a, fs::read(&third).unwrap());
}

#[test]
fn discard_and_thin_select_steps() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("thinned.csv");
    let settings = SamplerSettings {
        nwalkers: 3,
        nsteps: 10,
        discard: 4,
        thin: 3,
        init_seed: InitSeed::Jitter { fraction: 0.1 },
        ..SamplerSettings::default()
    };
    let outcome = MetropolisEnsemble
        .sample(&problem(), &MassActionSimulator::default(), &settings, &out)
        .unwrap();
    // Steps 4 and 7 are kept.
    assert_eq!(outcome.rows_written, 6);
    assert_eq!(settings.expected_rows(), 6);
}

#[test]
fn posterior_moves_towards_the_generating_rate() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mcmc_results.csv");
    let settings = SamplerSettings {
        nwalkers: 6,
        nsteps: 200,
        seed: 21,
        noise_sigma: 0.1,
        proposal_scale: 0.1,
        ..SamplerSettings::default()
    };
    MetropolisEnsemble
        .sample(&problem(), &MassActionSimulator::default(), &settings, &out)
        .unwrap();
    let samples = PosteriorSamples::load(&out, &["k".to_string()]).unwrap();
    let mean = samples.trailing_mean(300).unwrap()["k"];
    assert!((mean - 0.5).abs() < 0.05, "posterior mean {mean}");
}

#[test]
fn zero_thin_is_rejected_before_sampling() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.csv");
    let settings = SamplerSettings {
        thin: 0,
        ..SamplerSettings::default()
    };
    let err = MetropolisEnsemble
        .sample(&problem(), &MassActionSimulator::default(), &settings, &out)
        .unwrap_err();
    assert_eq!(err.code(), "sampler-settings");
    assert!(!out.exists());
}

#[test]
fn every_estimated_parameter_needs_a_prior() {
    let dir = tempdir().unwrap();
    let mut problem = problem();
    problem.prior = PriorSet::new();
    let err = MetropolisEnsemble
        .sample(
            &problem,
            &MassActionSimulator::default(),
            &settings(1),
            &dir.path().join("never.csv"),
        )
        .unwrap_err();
    assert_eq!(err.code(), "prior-missing");
}

#[test]
fn unknown_parameters_are_rejected() {
    let dir = tempdir().unwrap();
    let mut problem = problem();
    problem.params_to_estimate = vec!["k_missing".to_string()];
    let err = MetropolisEnsemble
        .sample(
            &problem,
            &MassActionSimulator::default(),
            &settings(1),
            &dir.path().join("never.csv"),
        )
        .unwrap_err();
    assert_eq!(err.code(), "unknown-parameter");
}

#[test]
fn reloaded_samples_reproduce_the_chain_and_its_trailing_mean() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mcmc_results.csv");
    let settings = SamplerSettings {
        nsteps: 40,
        discard: 5,
        thin: 2,
        ..settings(21)
    };
    let outcome = MetropolisEnsemble
        .sample(&problem(), &MassActionSimulator::default(), &settings, &out)
        .unwrap();
    assert_eq!(outcome.chain.len(), outcome.rows_written);
    assert_eq!(outcome.chain.len(), settings.expected_rows());

    let names = vec!["k".to_string()];
    let samples = PosteriorSamples::load(&out, &names).unwrap();
    assert_eq!(samples.rows(), outcome.chain.as_slice());

    for window in [1, 7, 30, outcome.chain.len(), outcome.chain.len() + 10] {
        let tail = &outcome.chain[outcome.chain.len().saturating_sub(window)..];
        let expected = tail.iter().map(|row| row[0]).sum::<f64>() / tail.len() as f64;
        let mean = samples.trailing_mean(window).unwrap();
        assert!(
            (mean["k"] - expected).abs() < 1e-12,
            "window {window}: {} vs {expected}",
            mean["k"]
        );
    }
}
