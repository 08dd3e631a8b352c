use std::fs;

use proptest::prelude::*;
use pure_core::RngHandle;
use pure_infer::{PosteriorSamples, PriorFamily, PriorSet, PriorSpec, DEFAULT_TRAILING_WINDOW};
use tempfile::tempdir;

fn names() -> Vec<String> {
    vec!["k_forward2".to_string(), "k_forward4".to_string()]
}

#[test]
fn positive_gaussian_has_no_mass_at_or_below_zero() {
    let prior = PriorSpec::gaussian(0.04, 0.1).positive();
    assert_eq!(prior.log_density(-0.01).unwrap(), f64::NEG_INFINITY);
    assert_eq!(prior.log_density(0.0).unwrap(), f64::NEG_INFINITY);
    let at_center = prior.log_density(0.04).unwrap();
    let expected = -0.5 * (2.0 * std::f64::consts::PI).ln() - 0.1f64.ln();
    assert!((at_center - expected).abs() < 1e-12);
}

#[test]
fn uniform_prior_is_flat_inside_bounds() {
    let prior = PriorSpec::uniform(0.0, 2.0);
    let inside = prior.log_density(0.5).unwrap();
    assert!((inside - 0.5f64.ln()).abs() < 1e-12);
    assert_eq!(prior.log_density(1.5).unwrap(), inside);
    assert_eq!(prior.log_density(3.0).unwrap(), f64::NEG_INFINITY);
}

#[test]
fn invalid_prior_parameters_are_reported() {
    let set = PriorSet::new().with("k", PriorSpec::gaussian(0.0, -1.0));
    let err = set.require(&["k".to_string()]).unwrap_err();
    assert_eq!(err.code(), "prior-invalid");
}

#[test]
fn missing_prior_is_reported() {
    let set = PriorSet::new().with("k_forward2", PriorSpec::gaussian(0.04, 0.1));
    let err = set.require(&names()).unwrap_err();
    assert_eq!(err.code(), "prior-missing");
    assert_eq!(
        err.info().context.get("parameter").map(String::as_str),
        Some("k_forward4")
    );
}

#[test]
fn priors_parse_from_yaml() {
    let yaml = "\
k_forward2: {family: gaussian, center: 0.04, spread: 0.1, positive: true}
k_forward4: {family: log_gaussian, center: -3.0, spread: 0.5}
";
    let set: PriorSet = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(set.len(), 2);
    let first = set.get("k_forward2").unwrap();
    assert!(first.positive);
    assert_eq!(
        first.family,
        PriorFamily::Gaussian {
            center: 0.04,
            spread: 0.1
        }
    );
    assert!(!set.get("k_forward4").unwrap().positive);
    let order: Vec<&String> = set.iter().map(|(name, _)| name).collect();
    assert_eq!(order, names().iter().collect::<Vec<_>>());
}

#[test]
fn trailing_mean_uses_only_the_last_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mcmc_results.csv");
    fs::write(&path, "1,10\n2,20\n3,30\n5,50\n").unwrap();
    let samples = PosteriorSamples::load(&path, &names()).unwrap();
    assert_eq!(samples.len(), 4);
    let mean = samples.trailing_mean(2).unwrap();
    assert_eq!(mean["k_forward2"], 4.0);
    assert_eq!(mean["k_forward4"], 40.0);
    let keys: Vec<&String> = mean.keys().collect();
    assert_eq!(keys, names().iter().collect::<Vec<_>>());
}

#[test]
fn window_longer_than_samples_averages_everything() {
    let samples =
        PosteriorSamples::from_rows(names(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let mean = samples.trailing_mean(DEFAULT_TRAILING_WINDOW).unwrap();
    assert_eq!(mean["k_forward2"], 2.0);
    assert_eq!(mean["k_forward4"], 3.0);
}

#[test]
fn zero_window_is_rejected() {
    let samples = PosteriorSamples::from_rows(names(), vec![vec![1.0, 2.0]]).unwrap();
    assert_eq!(samples.trailing_mean(0).unwrap_err().code(), "trailing-window");
}

#[test]
fn empty_samples_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mcmc_results.csv");
    fs::write(&path, "").unwrap();
    let err = PosteriorSamples::load(&path, &names()).unwrap_err();
    assert_eq!(err.code(), "no-samples");
}

#[test]
fn column_count_must_match_labels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mcmc_results.csv");
    fs::write(&path, "1,2,3\n").unwrap();
    let err = PosteriorSamples::load(&path, &names()).unwrap_err();
    assert_eq!(err.code(), "samples-shape");
}

proptest! {
    #[test]
    fn positive_draws_stay_positive(seed in any::<u64>()) {
        let prior = PriorSpec::gaussian(0.03, 0.1).positive();
        let mut rng = RngHandle::from_seed(seed);
        for _ in 0..32 {
            prop_assert!(prior.draw(&mut rng).unwrap() > 0.0);
        }
    }

    #[test]
    fn written_samples_reload_exactly(
        rows in prop::collection::vec(prop::collection::vec(-1.0e6f64..1.0e6, 2), 1..40),
        window in 1usize..60,
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mcmc_results.csv");
        let body: String = rows
            .iter()
            .map(|row| format!("{},{}\n", row[0], row[1]))
            .collect();
        fs::write(&path, body).unwrap();

        let loaded = PosteriorSamples::load(&path, &names()).unwrap();
        prop_assert_eq!(loaded.rows(), rows.as_slice());

        let tail_start = rows.len().saturating_sub(window);
        let tail = &rows[tail_start..];
        let expected: f64 = tail.iter().map(|row| row[0]).sum::<f64>() / tail.len() as f64;
        let mean = loaded.trailing_mean(window).unwrap();
        prop_assert_eq!(mean["k_forward2"], expected);
    }
}
