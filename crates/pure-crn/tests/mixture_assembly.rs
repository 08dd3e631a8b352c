use std::collections::BTreeMap;

use pure_crn::{
    Component, MechanismKind, Mixture, PureTranscription, RegisterPolicy, Role, Species,
    TranscriptionElongation,
};

#[test]
fn default_mixture_has_seven_tagged_components() {
    let mixture = PureTranscription::default().build().unwrap();
    assert_eq!(mixture.name(), "pure_transcription");
    assert_eq!(mixture.components().len(), 7);

    let mut roles: BTreeMap<&str, Role> = BTreeMap::new();
    for component in mixture.components() {
        let role = component.role().expect("every component carries a role");
        roles.insert(component.name(), role);
    }
    assert_eq!(roles["RNAP"], Role::Machinery);
    for name in ["ATP", "GTP", "CTP", "UTP"] {
        assert_eq!(roles[name], Role::Nucleotide);
    }
    for name in ["GDP", "PO4"] {
        assert_eq!(roles[name], Role::SmallMolecule);
    }
}

#[test]
fn default_mixture_registers_one_implemented_mechanism() {
    let mixture = PureTranscription::default().build().unwrap();
    let registered: Vec<(MechanismKind, bool)> = mixture
        .mechanisms()
        .map(|(kind, mechanism)| (kind, mechanism.is_implemented()))
        .collect();
    assert_eq!(
        registered,
        vec![
            (MechanismKind::TxInitiation, true),
            (MechanismKind::TxElongation, false),
            (MechanismKind::TxTermination, false),
        ]
    );
    let initiation = mixture.mechanism(MechanismKind::TxInitiation).unwrap();
    assert_eq!(initiation.kind().as_str(), "tx_initiation");
}

#[test]
fn custom_names_are_honoured() {
    let names = PureTranscription {
        name: "tx_only".to_string(),
        rnap: "T7RNAP".to_string(),
        ..PureTranscription::default()
    };
    let mixture = names.build().unwrap();
    assert_eq!(mixture.name(), "tx_only");
    let rnap = mixture.component("T7RNAP").unwrap();
    assert_eq!(rnap.role(), Some(Role::Machinery));
    assert!(mixture.component("RNAP").is_none());
}

#[test]
fn colliding_role_names_are_rejected() {
    let names = PureTranscription {
        gdp: "ATP".to_string(),
        ..PureTranscription::default()
    };
    let err = names.build().unwrap_err();
    assert_eq!(err.code(), "component-exists");
}

#[test]
fn second_mechanism_of_a_kind_follows_policy() {
    let mut mixture = PureTranscription::default().build().unwrap();
    let rnap = Species::protein("RNAP");

    let err = mixture
        .add_mechanism(
            Box::new(TranscriptionElongation::new(rnap.clone())),
            RegisterPolicy::Reject,
        )
        .unwrap_err();
    assert_eq!(err.code(), "mechanism-exists");

    mixture
        .add_mechanism(
            Box::new(TranscriptionElongation::new(rnap)),
            RegisterPolicy::Overwrite,
        )
        .unwrap();
    assert_eq!(mixture.mechanisms().count(), 3);
}

#[test]
fn role_assignment_replaces_previous_role() {
    let mut component = Component::protein("GTP").with_role(Role::SmallMolecule);
    component.set_role(Role::Nucleotide);
    assert_eq!(component.role(), Some(Role::Nucleotide));
}

#[test]
fn duplicate_component_names_are_rejected() {
    let mut mixture = Mixture::new("scratch");
    mixture.add_component(Component::protein("ATP")).unwrap();
    let err = mixture.add_component(Component::protein("ATP")).unwrap_err();
    assert_eq!(err.code(), "component-exists");
}
