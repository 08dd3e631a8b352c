//! Mechanism trait and the reaction templates it expands into.

use std::fmt;

use pure_core::PureError;
use serde::{Deserialize, Serialize};

use crate::parameter::ParameterResolver;
use crate::reaction::Reaction;
use crate::species::Species;

/// Registry key of a mechanism within a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    /// RNAP binding, GTP hydrolysis and product release.
    TxInitiation,
    /// Nucleotide addition along the transcript.
    TxElongation,
    /// Transcript release.
    TxTermination,
}

impl MechanismKind {
    /// Every kind in registry order.
    pub const ALL: [MechanismKind; 3] = [
        MechanismKind::TxInitiation,
        MechanismKind::TxElongation,
        MechanismKind::TxTermination,
    ];

    /// Stable string key (`tx_initiation`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            MechanismKind::TxInitiation => "tx_initiation",
            MechanismKind::TxElongation => "tx_elongation",
            MechanismKind::TxTermination => "tx_termination",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless generator of species and reactions for one phase of a process.
///
/// A mechanism is constructed once with its role bindings and invoked for
/// every template (DNA part) during a model build.
pub trait Mechanism: fmt::Debug + Send + Sync {
    /// Mechanism name; also the mechanism component of parameter keys.
    fn name(&self) -> &str;

    /// Registry key of the mechanism.
    fn kind(&self) -> MechanismKind;

    /// Whether the mechanism emits anything. Placeholders return `false`.
    fn is_implemented(&self) -> bool {
        true
    }

    /// Declares every species the mechanism needs for `template`.
    fn update_species(&self, template: &Species) -> Result<Vec<Species>, PureError>;

    /// Emits the reactions for `template` with parameters taken from `params`.
    fn update_reactions(
        &self,
        template: &Species,
        params: &ParameterResolver<'_>,
    ) -> Result<Vec<Reaction>, PureError>;
}
