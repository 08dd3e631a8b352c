mod common;

use std::fs;

use pure_infer::{normalized_sensitivity, MassActionSimulator};
use tempfile::tempdir;

use common::{decay_model, precise_simulator, DECAY_RATE};

#[test]
fn decay_sensitivity_matches_closed_form() {
    let timepoints = [0.0, 1.0, 2.0, 4.0];
    let matrix = normalized_sensitivity(
        &precise_simulator(),
        &decay_model(),
        "mRNA",
        &timepoints,
        1e-3,
    )
    .unwrap();
    let row = matrix.row("k").unwrap();
    assert_eq!(row[0], 0.0);
    for (t, value) in timepoints.iter().zip(row).skip(1) {
        let decay = (-DECAY_RATE * t).exp();
        let expected = DECAY_RATE * t * decay / (1.0 - decay);
        assert!((value - expected).abs() < 1e-3, "t={t}: {value} vs {expected}");
    }
}

#[test]
fn zero_parameters_have_zero_sensitivity() {
    let mut model = decay_model();
    model.add_parameter("unused", 0.0);
    let matrix =
        normalized_sensitivity(&MassActionSimulator::default(), &model, "A", &[0.0, 1.0], 1e-3)
            .unwrap();
    assert_eq!(matrix.parameters, vec!["k".to_string(), "unused".to_string()]);
    assert_eq!(matrix.row("unused").unwrap(), &[0.0, 0.0]);
}

#[test]
fn relative_step_must_be_a_fraction() {
    let err = normalized_sensitivity(
        &MassActionSimulator::default(),
        &decay_model(),
        "mRNA",
        &[0.0, 1.0],
        0.0,
    )
    .unwrap_err();
    assert_eq!(err.code(), "sensitivity-step");
}

#[test]
fn matrix_csv_has_parameter_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sensitivity.csv");
    let matrix = normalized_sensitivity(
        &MassActionSimulator::default(),
        &decay_model(),
        "mRNA",
        &[0.0, 60.0],
        1e-3,
    )
    .unwrap();
    matrix.write_csv(&path).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "parameter,0,60");
    assert!(lines[1].starts_with("k,0,"));
}
