use std::fs;
use std::path::Path;
use std::process::Command;

fn pure_sim(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pure-sim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run pure-sim")
}

fn path(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

fn build_model(dir: &Path) -> std::path::PathBuf {
    let params = dir.join("params.csv");
    fs::write(
        &params,
        "mechanism_id,part_id,param_name,param_val\n\
         ,,NTP_deg,0.0001\n\
         transcription_initiation,,k_rnapbF,0.01\n\
         ,,k_rnapbF2,0.5\n",
    )
    .unwrap();
    let model = dir.join("model.json");
    let output = pure_sim(&[
        "build-model",
        "--params",
        path(&params),
        "--global",
        "k_rnapbF3=0.2",
        "--template",
        "T7_MGapt",
        "--out",
        path(&model),
    ]);
    assert!(
        output.status.success(),
        "build-model failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    model
}

#[test]
fn build_then_simulate_writes_trajectory_and_figure() {
    let dir = tempfile::tempdir().unwrap();
    let model = build_model(dir.path());
    let json = fs::read_to_string(&model).unwrap();
    assert!(json.contains("dna_T7_MGapt"));
    assert!(json.contains("k_rnapbF3"));

    let initial = dir.path().join("initial.csv");
    fs::write(&initial, "protein_RNAP,1.0\nprotein_GTP,2500\n").unwrap();
    let csv = dir.path().join("sim.csv");
    let svg = dir.path().join("sim.svg");
    let output = pure_sim(&[
        "simulate",
        "--model",
        path(&model),
        "--initial-csv",
        path(&initial),
        "--set",
        "dna_T7_MGapt=0.005",
        "--hours",
        "1",
        "--points",
        "7",
        "--out",
        path(&csv),
        "--species",
        "protein_GDP",
        "--svg",
        path(&svg),
    ]);
    assert!(
        output.status.success(),
        "simulate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let table = fs::read_to_string(&csv).unwrap();
    let mut lines = table.lines();
    assert!(lines.next().unwrap().starts_with("time,"));
    assert_eq!(lines.count(), 7);
    assert!(fs::read_to_string(&svg).unwrap().starts_with("<svg"));
}

#[test]
fn unknown_initial_species_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = build_model(dir.path());
    let output = pure_sim(&[
        "simulate",
        "--model",
        path(&model),
        "--set",
        "protein_NOPE=1",
        "--out",
        path(&dir.path().join("sim.csv")),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("protein_NOPE"));
}

#[test]
fn sensitivity_and_corner_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let model = build_model(dir.path());
    let table = dir.path().join("sens.csv");
    let heatmap = dir.path().join("sens.svg");
    let output = pure_sim(&[
        "sensitivity",
        "--model",
        path(&model),
        "--set",
        "protein_RNAP=1",
        "--set",
        "dna_T7_MGapt=0.005",
        "--set",
        "protein_GTP=2500",
        "--hours",
        "1",
        "--points",
        "5",
        "--species",
        "protein_GDP",
        "--out",
        path(&table),
        "--svg",
        path(&heatmap),
    ]);
    assert!(
        output.status.success(),
        "sensitivity failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    // header plus one row per parameter
    assert_eq!(fs::read_to_string(&table).unwrap().lines().count(), 5);
    assert!(heatmap.exists());

    let samples = dir.path().join("samples.csv");
    fs::write(&samples, "0.1,1.0\n0.2,1.5\n0.15,1.2\n").unwrap();
    let corner = dir.path().join("corner.svg");
    let output = pure_sim(&[
        "corner",
        "--samples",
        path(&samples),
        "--names",
        "k1,k2",
        "--out",
        path(&corner),
    ]);
    assert!(output.status.success());
    let svg = fs::read_to_string(&corner).unwrap();
    assert!(svg.contains("k1") && svg.contains("k2"));
}

#[test]
fn corner_writes_one_marginal_per_column() {
    let dir = tempfile::tempdir().unwrap();
    let samples = dir.path().join("samples.csv");
    fs::write(&samples, "0.1,1.0\n0.2,1.5\n0.15,1.2\n0.3,0.9\n").unwrap();
    let marginals = dir.path().join("marginals");
    let output = pure_sim(&[
        "corner",
        "--samples",
        path(&samples),
        "--names",
        "k1,k2",
        "--tail",
        "3",
        "--out",
        path(&dir.path().join("corner.svg")),
        "--marginals",
        path(&marginals),
    ]);
    assert!(
        output.status.success(),
        "corner failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    for name in ["k1", "k2"] {
        let svg = fs::read_to_string(marginals.join(format!("{name}_marginal.svg"))).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<rect"));
    }
}

#[test]
fn solver_flags_reach_the_integrator() {
    let dir = tempfile::tempdir().unwrap();
    let model = build_model(dir.path());
    let base = |extra: &[&str], out: &str| {
        let csv = dir.path().join(out);
        let mut args = vec![
            "simulate",
            "--model",
            path(&model),
            "--set",
            "protein_RNAP=1",
            "--set",
            "dna_T7_MGapt=0.005",
            "--hours",
            "1",
            "--points",
            "7",
        ];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["--out", path(&csv)]);
        (pure_sim(&args), csv)
    };

    let (output, csv) = base(&["--rtol", "1e-8", "--atol", "1e-12"], "tight.csv");
    assert!(
        output.status.success(),
        "simulate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read_to_string(&csv).unwrap().lines().count(), 8);

    // 600 s output spacing needs far more than ten one-second steps.
    let (output, _) = base(&["--max-step", "1", "--max-steps", "10"], "starved.csv");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("step-budget"));
}
