use proptest::prelude::*;
use pure_crn::Species;

fn species_strategy() -> impl Strategy<Value = Species> {
    ("[A-Za-z][A-Za-z0-9]{0,6}", prop_oneof![Just("protein"), Just("dna"), Just("rna")])
        .prop_map(|(name, material)| Species::with_material(material, name))
}

proptest! {
    #[test]
    fn complex_identity_ignores_part_order(parts in prop::collection::vec(species_strategy(), 2..5)) {
        let forward = Species::complex(parts.clone());
        let mut reversed = parts.clone();
        reversed.reverse();
        let backward = Species::complex(reversed);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.identifier(), backward.identifier());
        prop_assert_eq!(forward.parts().len(), parts.len());
    }

    #[test]
    fn identifier_prefixes_material(species in species_strategy()) {
        let identifier = species.identifier();
        let material = species.material().unwrap_or_default();
        prop_assert!(identifier.starts_with(material));
        prop_assert!(identifier.ends_with(species.name()));
    }
}
