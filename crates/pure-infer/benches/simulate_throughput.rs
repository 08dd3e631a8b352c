use criterion::{criterion_group, criterion_main, Criterion};
use pure_crn::{PureTranscription, Species};
use pure_infer::{MassActionSimulator, SimType, Simulator};

fn pure_model() -> pure_crn::ModelDescription {
    let mut mixture = PureTranscription::default().build().unwrap();
    let params = mixture.parameters_mut();
    params.set_global("NTP_deg", 0.0001);
    params.set_global("k_rnapbF", 0.01);
    params.set_global("k_rnapbF2", 0.5);
    params.set_global("k_rnapbF3", 0.2);
    let mut model = mixture
        .compile(&[Species::dna("T7_MGapt")])
        .unwrap()
        .to_model_description()
        .unwrap();
    for (name, value) in [
        ("protein_RNAP", 1.0),
        ("dna_T7_MGapt", 0.005),
        ("protein_ATP", 3750.0),
        ("protein_GTP", 2500.0),
        ("protein_CTP", 1250.0),
        ("protein_UTP", 1250.0),
    ] {
        model.add_species(name, value);
    }
    model
}

fn bench_simulate(c: &mut Criterion) {
    let model = pure_model();
    let simulator = MassActionSimulator::default();
    let timepoints: Vec<f64> = (0..=240).map(|i| i as f64 * 60.0).collect();

    c.bench_function("pure_tx_four_hours", |b| {
        b.iter(|| {
            let _ = simulator
                .simulate(&model, &timepoints, SimType::Deterministic)
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
