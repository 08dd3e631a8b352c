//! Mixture for transcription of a gene in the PURE cell-free system.

use indexmap::IndexMap;
use pure_core::PureError;
use serde::{Deserialize, Serialize};

use crate::component::{Component, Role};
use crate::mixture::{Mixture, RegisterPolicy};
use crate::object::CrnObject;
use crate::transcription::{
    TranscriptionElongation, TranscriptionInitiation, TranscriptionTermination,
};

fn default_name() -> String {
    "pure_transcription".to_string()
}

fn default_rnap() -> String {
    "RNAP".to_string()
}

fn default_atp() -> String {
    "ATP".to_string()
}

fn default_gtp() -> String {
    "GTP".to_string()
}

fn default_ctp() -> String {
    "CTP".to_string()
}

fn default_utp() -> String {
    "UTP".to_string()
}

fn default_gdp() -> String {
    "GDP".to_string()
}

fn default_po4() -> String {
    "PO4".to_string()
}

/// Names of the seven chemical roles of a PURE transcription mixture.
///
/// Every field defaults to its canonical name, so a YAML document only needs
/// to list the roles it renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PureTranscription {
    /// Mixture name.
    #[serde(default = "default_name")]
    pub name: String,
    /// RNA polymerase.
    #[serde(default = "default_rnap")]
    pub rnap: String,
    /// ATP.
    #[serde(default = "default_atp")]
    pub atp: String,
    /// GTP.
    #[serde(default = "default_gtp")]
    pub gtp: String,
    /// CTP.
    #[serde(default = "default_ctp")]
    pub ctp: String,
    /// UTP.
    #[serde(default = "default_utp")]
    pub utp: String,
    /// GDP.
    #[serde(default = "default_gdp")]
    pub gdp: String,
    /// Inorganic phosphate.
    #[serde(default = "default_po4")]
    pub po4: String,
}

impl Default for PureTranscription {
    fn default() -> Self {
        Self {
            name: default_name(),
            rnap: default_rnap(),
            atp: default_atp(),
            gtp: default_gtp(),
            ctp: default_ctp(),
            utp: default_utp(),
            gdp: default_gdp(),
            po4: default_po4(),
        }
    }
}

impl PureTranscription {
    /// Assembles the mixture: seven role-tagged protein components, the
    /// initiation mechanism wired to their species, and the elongation and
    /// termination placeholders.
    pub fn build(&self) -> Result<Mixture, PureError> {
        let mut mixture = Mixture::new(self.name.clone());

        let rnap = Component::protein(&self.rnap).with_role(Role::Machinery);
        let nucleotides = [
            ("ATP", &self.atp),
            ("GTP", &self.gtp),
            ("CTP", &self.ctp),
            ("UTP", &self.utp),
        ]
        .map(|(key, name)| (key, Component::protein(name).with_role(Role::Nucleotide)));
        let small_molecules = [("GDP", &self.gdp), ("PO4", &self.po4)]
            .map(|(key, name)| (key, Component::protein(name).with_role(Role::SmallMolecule)));

        let active_nucleotides: IndexMap<String, CrnObject> = nucleotides
            .iter()
            .map(|(key, component)| {
                (key.to_string(), CrnObject::from(component.species().clone()))
            })
            .collect();
        let small_molecule_species: IndexMap<String, CrnObject> = small_molecules
            .iter()
            .map(|(key, component)| {
                (key.to_string(), CrnObject::from(component.species().clone()))
            })
            .collect();

        let rnap_species = rnap.species().clone();
        mixture.add_component(rnap)?;
        mixture.add_components(nucleotides.into_iter().map(|(_, component)| component))?;
        mixture.add_components(small_molecules.into_iter().map(|(_, component)| component))?;

        let initiation = TranscriptionInitiation::new(
            rnap_species.clone(),
            active_nucleotides,
            small_molecule_species,
        )?;
        mixture.add_mechanism(Box::new(initiation), RegisterPolicy::Reject)?;
        mixture.add_mechanism(
            Box::new(TranscriptionElongation::new(rnap_species.clone())),
            RegisterPolicy::Reject,
        )?;
        mixture.add_mechanism(
            Box::new(TranscriptionTermination::new(rnap_species)),
            RegisterPolicy::Reject,
        )?;
        Ok(mixture)
    }
}
