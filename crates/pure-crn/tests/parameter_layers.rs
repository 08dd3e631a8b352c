use std::fs;

use pure_crn::{ParameterScope, ParameterStore};
use tempfile::tempdir;

const MECH: &str = "transcription_initiation";

#[test]
fn exact_part_key_wins() {
    let mut store = ParameterStore::new();
    store.set_global("k_rnapbF", 1.0);
    store.set_for_mechanism(MECH, "k_rnapbF", 2.0);
    store.set_for_part(MECH, "T7_MGapt", "k_rnapbF", 3.0);

    let param = store.resolver(MECH, Some("T7_MGapt")).resolve("k_rnapbF").unwrap();
    assert_eq!(param.value, 3.0);
    assert_eq!(param.scope, ParameterScope::Part);
    assert_eq!(param.model_name(), "k_rnapbF_T7_MGapt");
}

#[test]
fn mechanism_layer_is_next() {
    let mut store = ParameterStore::new();
    store.set_global("k_rnapbF", 1.0);
    store.set_for_mechanism(MECH, "k_rnapbF", 2.0);
    store.set_for_part(MECH, "other_part", "k_rnapbF", 3.0);

    let param = store.resolver(MECH, Some("T7_MGapt")).resolve("k_rnapbF").unwrap();
    assert_eq!(param.value, 2.0);
    assert_eq!(param.scope, ParameterScope::Mechanism);
    assert_eq!(param.model_name(), "k_rnapbF");
}

#[test]
fn global_default_is_last() {
    let mut store = ParameterStore::new();
    store.set_global("NTP_deg", 0.5);
    store.set_for_mechanism("some_other_mechanism", "NTP_deg", 9.0);

    let param = store.resolver(MECH, Some("T7_MGapt")).resolve("NTP_deg").unwrap();
    assert_eq!(param.value, 0.5);
    assert_eq!(param.scope, ParameterScope::Global);
}

#[test]
fn unresolved_names_fail() {
    let store = ParameterStore::new();
    let err = store.resolver(MECH, Some("pT7")).resolve("k_rnapbF").unwrap_err();
    assert_eq!(err.code(), "parameter-missing");
    assert_eq!(err.info().context.get("part_id").map(String::as_str), Some("pT7"));
}

#[test]
fn parameter_table_feeds_every_layer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.csv");
    fs::write(
        &path,
        "mechanism_id,part_id,param_name,param_val\n\
         ,,NTP_deg,0.01\n\
         transcription_initiation,,k_rnapbF,10.194337\n\
         transcription_initiation,pT7,k_rnapbF,12.5\n",
    )
    .unwrap();
    let store = ParameterStore::from_csv(&path).unwrap();
    assert_eq!(store.len(), 3);

    let resolver = store.resolver(MECH, Some("pT7"));
    assert_eq!(resolver.resolve("NTP_deg").unwrap().value, 0.01);
    assert_eq!(resolver.resolve("k_rnapbF").unwrap().value, 12.5);
    let fallback = store.resolver(MECH, Some("pOther"));
    assert_eq!(fallback.resolve("k_rnapbF").unwrap().value, 10.194337);
}

#[test]
fn parameter_table_rejects_unreachable_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.csv");
    fs::write(
        &path,
        "mechanism_id,part_id,param_name,param_val\n,pT7,k_rnapbF,1.0\n",
    )
    .unwrap();
    let err = ParameterStore::from_csv(&path).unwrap_err();
    assert_eq!(err.code(), "parameter-row");
}

#[test]
fn parameter_table_rejects_non_numeric_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.csv");
    fs::write(
        &path,
        "mechanism_id,part_id,param_name,param_val\n,,NTP_deg,fast\n",
    )
    .unwrap();
    let err = ParameterStore::from_csv(&path).unwrap_err();
    assert_eq!(err.code(), "parameter-row");
}
