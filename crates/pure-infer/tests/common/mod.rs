#![allow(dead_code)]

use pure_crn::{ModelDescription, PureTranscription, ReactionDescription, Species, TermDescription};
use pure_data::ReplicateTable;
use pure_infer::{IntegratorSettings, MassActionSimulator};

pub const DECAY_RATE: f64 = 0.5;
pub const DECAY_START: f64 = 10.0;

/// `A -> mRNA` with rate `k`.
pub fn decay_model() -> ModelDescription {
    let mut model = ModelDescription::new("decay");
    model.add_species("A", DECAY_START);
    model.add_species("mRNA", 0.0);
    model.add_parameter("k", DECAY_RATE);
    model
        .add_reaction(ReactionDescription {
            reactants: vec![TermDescription::one("A")],
            products: vec![TermDescription::one("mRNA")],
            rate_parameter: "k".to_string(),
        })
        .unwrap();
    model
}

pub fn decay_mrna(k: f64, t: f64) -> f64 {
    DECAY_START * (1.0 - (-k * t).exp())
}

pub fn decay_replicates(timepoints: &[f64], offsets: &[f64]) -> Vec<ReplicateTable> {
    offsets
        .iter()
        .enumerate()
        .map(|(idx, offset)| ReplicateTable {
            measurement: "mRNA".to_string(),
            channel: format!("mRNA{idx}"),
            timepoints: timepoints.to_vec(),
            values: timepoints
                .iter()
                .map(|t| decay_mrna(DECAY_RATE, *t) + offset)
                .collect(),
        })
        .collect()
}

pub fn precise_simulator() -> MassActionSimulator {
    MassActionSimulator::new(IntegratorSettings {
        rtol: 1e-10,
        atol: 1e-12,
        ..IntegratorSettings::default()
    })
}

pub fn template() -> Species {
    Species::dna("T7_MGapt")
}

/// Compiled PURE transcription model with typical initial concentrations.
pub fn pure_model() -> ModelDescription {
    let mut mixture = PureTranscription::default().build().unwrap();
    let params = mixture.parameters_mut();
    params.set_global("NTP_deg", 0.0001);
    params.set_global("k_rnapbF", 0.01);
    params.set_global("k_rnapbF2", 0.5);
    params.set_global("k_rnapbF3", 0.2);
    let crn = mixture.compile(&[template()]).unwrap();
    let mut model = crn.to_model_description().unwrap();
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
