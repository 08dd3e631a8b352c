use std::fs;
use std::path::Path;

use pure_data::{
    baseline, hours, load_initial_conditions, load_time_series, preprocess, BaselinePolicy,
    Preprocessing, TimeSeries,
};
use tempfile::tempdir;

const COLUMNS: [&str; 4] = ["time", "mRNA0", "mRNA1", "mRNA2"];

fn write(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
}

fn scenario_series() -> TimeSeries {
    TimeSeries::new(
        COLUMNS.iter().map(|c| c.to_string()).collect(),
        vec![
            vec![0.0, 10.0, 12.0, 11.0],
            vec![60.0, 15.0, 20.0, 18.0],
            vec![7200.0, 50.0, 60.0, 55.0],
        ],
    )
    .unwrap()
}

#[test]
fn mean_baseline_and_cutoff_produce_two_rows_per_replicate() {
    let settings = Preprocessing {
        baseline: BaselinePolicy::FirstRowMean,
        cutoff_seconds: 3600.0,
    };
    let replicates = preprocess(scenario_series(), &settings, "mRNA").unwrap();
    assert_eq!(replicates.len(), 3);

    let late: Vec<f64> = replicates.iter().map(|r| r.values[1]).collect();
    assert_eq!(late, vec![4.0, 9.0, 7.0]);
    let early: Vec<f64> = replicates.iter().map(|r| r.values[0]).collect();
    assert_eq!(early, vec![-1.0, 1.0, 0.0]);
    for replicate in &replicates {
        assert_eq!(replicate.measurement, "mRNA");
        assert_eq!(replicate.timepoints, vec![0.0, 60.0]);
    }
    assert_eq!(replicates[2].channel, "mRNA2");
}

#[test]
fn raw_baseline_zeroes_the_first_row() {
    let settings = Preprocessing {
        baseline: BaselinePolicy::FirstRowRaw,
        cutoff_seconds: hours(4.0),
    };
    let replicates = preprocess(scenario_series(), &settings, "mRNA").unwrap();
    for replicate in &replicates {
        assert_eq!(replicate.values[0], 0.0);
        assert_eq!(replicate.len(), 2);
    }
    assert_eq!(replicates[1].values[1], 8.0);
}

#[test]
fn cutoff_is_inclusive() {
    let settings = Preprocessing {
        baseline: BaselinePolicy::FirstRowRaw,
        cutoff_seconds: 7200.0,
    };
    let replicates = preprocess(scenario_series(), &settings, "mRNA").unwrap();
    assert_eq!(replicates[0].timepoints, vec![0.0, 60.0, 7200.0]);
}

#[test]
fn cutoff_before_first_timepoint_is_an_error() {
    let series = TimeSeries::new(
        vec!["time".into(), "rep".into()],
        vec![vec![30.0, 1.0], vec![90.0, 2.0]],
    )
    .unwrap();
    let settings = Preprocessing {
        baseline: BaselinePolicy::FirstRowMean,
        cutoff_seconds: 10.0,
    };
    let err = preprocess(series, &settings, "mRNA").unwrap_err();
    assert_eq!(err.code(), "empty-after-truncation");
}

#[test]
fn mean_baseline_is_shared_across_channels() {
    let offsets = baseline(&scenario_series(), BaselinePolicy::FirstRowMean).unwrap();
    assert_eq!(offsets, vec![11.0, 11.0, 11.0]);
}

#[test]
fn loader_skips_header_and_reads_numeric_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mgapt.csv");
    write(
        &path,
        "Time (s),A,B,C\n0,10,12,11\n60,15,20,18\n7200,50,60,55\n",
    );
    let series = load_time_series(&path, &COLUMNS).unwrap();
    assert_eq!(series, scenario_series());
    assert_eq!(series.channel("mRNA1").unwrap(), vec![12.0, 20.0, 60.0]);
}

#[test]
fn loader_rejects_non_numeric_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    write(&path, "t,a,b,c\n0,1,2,3\n60,1,overflow,3\n");
    let err = load_time_series(&path, &COLUMNS).unwrap_err();
    assert_eq!(err.code(), "parse");
    let context = &err.info().context;
    assert_eq!(context.get("row").map(String::as_str), Some("3"));
    assert_eq!(context.get("column").map(String::as_str), Some("mRNA1"));
}

#[test]
fn loader_rejects_nan_and_infinite_fields() {
    let dir = tempdir().unwrap();
    let nan = dir.path().join("nan.csv");
    write(&nan, "t,a,b,c\n0,NaN,1,2\n60,5,6,7\n");
    let err = load_time_series(&nan, &COLUMNS).unwrap_err();
    assert_eq!(err.code(), "parse");
    assert!(matches!(err, pure_core::PureError::Data(_)));
    let context = &err.info().context;
    assert_eq!(context.get("row").map(String::as_str), Some("2"));
    assert_eq!(context.get("column").map(String::as_str), Some("mRNA0"));

    let inf = dir.path().join("inf.csv");
    write(&inf, "t,a,b,c\n0,1,2,3\n60,5,6,-inf\n");
    let err = load_time_series(&inf, &COLUMNS).unwrap_err();
    assert_eq!(err.code(), "parse");
    let context = &err.info().context;
    assert_eq!(context.get("row").map(String::as_str), Some("3"));
    assert_eq!(context.get("column").map(String::as_str), Some("mRNA2"));
}

#[test]
fn loader_rejects_short_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.csv");
    write(&path, "t,a,b,c\n0,1,2,3\n60,1,2\n");
    let err = load_time_series(&path, &COLUMNS).unwrap_err();
    assert_eq!(err.code(), "parse");
}

#[test]
fn loader_reports_missing_files() {
    let dir = tempdir().unwrap();
    let err = load_time_series(&dir.path().join("absent.csv"), &COLUMNS).unwrap_err();
    assert_eq!(err.code(), "read");
}

#[test]
fn initial_conditions_keep_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ic.csv");
    write(&path, "RNAPa,1\nATP,3750\nGTP,2500\nDNA,0.01\n");
    let mut values = load_initial_conditions(&path).unwrap();
    values.insert("DNA".to_string(), 0.005);
    let names: Vec<&str> = values.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["RNAPa", "ATP", "GTP", "DNA"]);
    assert_eq!(values["DNA"], 0.005);
}

#[test]
fn initial_conditions_reject_bad_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ic.csv");
    write(&path, "ATP,lots\n");
    let err = load_initial_conditions(&path).unwrap_err();
    assert_eq!(err.code(), "parse");

    write(&path, "ATP,3750\nGTP,NaN\n");
    let err = load_initial_conditions(&path).unwrap_err();
    assert_eq!(err.code(), "parse");
    assert_eq!(err.info().context.get("row").map(String::as_str), Some("2"));
}
