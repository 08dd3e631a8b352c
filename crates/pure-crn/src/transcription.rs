//! Transcription mechanisms for the PURE system.

use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};

use crate::mechanism::{Mechanism, MechanismKind};
use crate::object::CrnObject;
use crate::parameter::ParameterResolver;
use crate::reaction::Reaction;
use crate::species::Species;

/// Default name of [`TranscriptionInitiation`].
pub const INITIATION_NAME: &str = "transcription_initiation";

/// Nucleotide keys the initiation mechanism reads.
pub const NUCLEOTIDE_KEYS: [&str; 4] = ["ATP", "GTP", "CTP", "UTP"];

/// Small-molecule keys the initiation mechanism reads.
pub const SMALL_MOLECULE_KEYS: [&str; 2] = ["GDP", "PO4"];

/// Rate parameters resolved by [`TranscriptionInitiation::update_reactions`].
pub const INITIATION_PARAMETERS: [&str; 4] = ["NTP_deg", "k_rnapbF", "k_rnapbF2", "k_rnapbF3"];

fn require_species(object: CrnObject, argument: &str) -> Result<Species, PureError> {
    object.into_species().map_err(|other| {
        PureError::Validation(
            ErrorInfo::new("not-a-species", format!("'{argument}' must be a species"))
                .with_context("argument", argument)
                .with_context("received", other.kind_name()),
        )
    })
}

fn require_species_map(
    values: IndexMap<String, CrnObject>,
    argument: &str,
) -> Result<IndexMap<String, Species>, PureError> {
    let mut species = IndexMap::with_capacity(values.len());
    for (key, value) in values {
        let position = format!("{argument}[{key}]");
        species.insert(key, require_species(value, &position)?);
    }
    Ok(species)
}

fn role<'a>(
    map: &'a IndexMap<String, Species>,
    key: &str,
    argument: &str,
) -> Result<&'a Species, PureError> {
    map.get(key).ok_or_else(|| {
        PureError::Model(
            ErrorInfo::new("missing-role", format!("'{argument}' has no entry for {key}"))
                .with_context("argument", argument)
                .with_context("key", key),
        )
    })
}

/// RNAP binding, initial GTP incorporation and hydrolysis product release.
///
/// The mechanism is sequence independent: every transcribed template goes
/// through the same seven reactions regardless of its content.
#[derive(Debug, Clone)]
pub struct TranscriptionInitiation {
    name: String,
    rnap: Species,
    active_nucleotides: IndexMap<String, Species>,
    small_molecules: IndexMap<String, Species>,
}

impl TranscriptionInitiation {
    /// Validates the role bindings and builds the mechanism.
    ///
    /// `active_nucleotides` is keyed by ATP/GTP/CTP/UTP and `small_molecules`
    /// by GDP/PO4. Every value, and `rnap`, must be a species; anything else
    /// fails with [`PureError::Validation`].
    pub fn new(
        rnap: impl Into<CrnObject>,
        active_nucleotides: IndexMap<String, CrnObject>,
        small_molecules: IndexMap<String, CrnObject>,
    ) -> Result<Self, PureError> {
        let rnap = require_species(rnap.into(), "rnap")?;
        let active_nucleotides = require_species_map(active_nucleotides, "active_nucleotides")?;
        let small_molecules = require_species_map(small_molecules, "small_molecules")?;
        Ok(Self {
            name: INITIATION_NAME.to_string(),
            rnap,
            active_nucleotides,
            small_molecules,
        })
    }

    /// Overrides the mechanism name used for parameter lookup.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enzyme species.
    pub fn rnap(&self) -> &Species {
        &self.rnap
    }

    fn nucleotide(&self, key: &str) -> Result<&Species, PureError> {
        role(&self.active_nucleotides, key, "active_nucleotides")
    }

    fn small_molecule(&self, key: &str) -> Result<&Species, PureError> {
        role(&self.small_molecules, key, "small_molecules")
    }

    fn complexes(&self, template: &Species) -> Result<[Species; 3], PureError> {
        let gtp = self.nucleotide("GTP")?;
        let gdp = self.small_molecule("GDP")?;
        let po4 = self.small_molecule("PO4")?;
        Ok([
            Species::complex([self.rnap.clone(), template.clone()]),
            Species::complex([self.rnap.clone(), gtp.clone()]),
            Species::complex([self.rnap.clone(), gdp.clone(), po4.clone()]),
        ])
    }
}

impl Mechanism for TranscriptionInitiation {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MechanismKind {
        MechanismKind::TxInitiation
    }

    fn update_species(&self, template: &Species) -> Result<Vec<Species>, PureError> {
        let mut species = vec![template.clone(), self.rnap.clone()];
        species.extend(self.active_nucleotides.values().cloned());
        species.extend(self.small_molecules.values().cloned());
        species.extend(self.complexes(template)?);
        Ok(species)
    }

    fn update_reactions(
        &self,
        template: &Species,
        params: &ParameterResolver<'_>,
    ) -> Result<Vec<Reaction>, PureError> {
        let ntp_deg = params.resolve("NTP_deg")?;
        let k_rnapb_f = params.resolve("k_rnapbF")?;
        let k_rnapb_f2 = params.resolve("k_rnapbF2")?;
        let k_rnapb_f3 = params.resolve("k_rnapbF3")?;

        let [rnap_dna, rnap_gtp, rnap_gdp_po4] = self.complexes(template)?;
        let gdp = self.small_molecule("GDP")?;
        let po4 = self.small_molecule("PO4")?;

        let mut reactions = Vec::with_capacity(7);
        for key in NUCLEOTIDE_KEYS {
            let ntp = self.nucleotide(key)?;
            reactions.push(Reaction::mass_action(
                std::slice::from_ref(ntp),
                &[],
                ntp_deg.clone(),
            ));
        }
        let gtp = self.nucleotide("GTP")?;
        reactions.push(Reaction::mass_action(
            &[self.rnap.clone(), template.clone(), gtp.clone()],
            std::slice::from_ref(&rnap_gtp),
            k_rnapb_f,
        ));
        reactions.push(Reaction::mass_action(
            &[rnap_gtp],
            std::slice::from_ref(&rnap_gdp_po4),
            k_rnapb_f2,
        ));
        reactions.push(Reaction::mass_action(
            &[rnap_gdp_po4],
            &[rnap_dna, gdp.clone(), po4.clone()],
            k_rnapb_f3,
        ));
        Ok(reactions)
    }
}

/// Placeholder for nucleotide addition along the transcript.
///
/// Not yet specified: emits no species and no reactions.
#[derive(Debug, Clone)]
pub struct TranscriptionElongation {
    rnap: Species,
}

impl TranscriptionElongation {
    /// Binds the placeholder to the enzyme.
    pub fn new(rnap: Species) -> Self {
        Self { rnap }
    }

    /// Enzyme species.
    pub fn rnap(&self) -> &Species {
        &self.rnap
    }
}

impl Mechanism for TranscriptionElongation {
    fn name(&self) -> &str {
        "transcription_elongation"
    }

    fn kind(&self) -> MechanismKind {
        MechanismKind::TxElongation
    }

    fn is_implemented(&self) -> bool {
        false
    }

    fn update_species(&self, _template: &Species) -> Result<Vec<Species>, PureError> {
        Ok(Vec::new())
    }

    fn update_reactions(
        &self,
        _template: &Species,
        _params: &ParameterResolver<'_>,
    ) -> Result<Vec<Reaction>, PureError> {
        Ok(Vec::new())
    }
}

/// Placeholder for transcript termination and release.
///
/// Not yet specified: emits no species and no reactions.
#[derive(Debug, Clone)]
pub struct TranscriptionTermination {
    rnap: Species,
}

impl TranscriptionTermination {
    /// Binds the placeholder to the enzyme.
    pub fn new(rnap: Species) -> Self {
        Self { rnap }
    }

    /// Enzyme species.
    pub fn rnap(&self) -> &Species {
        &self.rnap
    }
}

impl Mechanism for TranscriptionTermination {
    fn name(&self) -> &str {
        "transcription_termination"
    }

    fn kind(&self) -> MechanismKind {
        MechanismKind::TxTermination
    }

    fn is_implemented(&self) -> bool {
        false
    }

    fn update_species(&self, _template: &Species) -> Result<Vec<Species>, PureError> {
        Ok(Vec::new())
    }

    fn update_reactions(
        &self,
        _template: &Species,
        _params: &ParameterResolver<'_>,
    ) -> Result<Vec<Reaction>, PureError> {
        Ok(Vec::new())
    }
}
