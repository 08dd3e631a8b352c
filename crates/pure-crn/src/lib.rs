#![deny(missing_docs)]
#![doc = "Reaction-network construction for PURE transcription: species, mass-action reactions, layered parameters, mechanisms, mixtures and compiled model descriptions."]

pub mod component;
pub mod mechanism;
pub mod mixture;
pub mod model;
pub mod object;
pub mod parameter;
pub mod pure;
pub mod reaction;
pub mod species;
pub mod transcription;

pub use component::{Component, Role};
pub use mechanism::{Mechanism, MechanismKind};
pub use mixture::{ChemicalReactionNetwork, Mixture, RegisterPolicy};
pub use model::{ModelDescription, ReactionDescription, TermDescription};
pub use object::CrnObject;
pub use parameter::{Parameter, ParameterKey, ParameterResolver, ParameterScope, ParameterStore};
pub use pure::PureTranscription;
pub use reaction::{MassAction, Reaction, StoichiometricTerm};
pub use species::{Species, SpeciesKind};
pub use transcription::{
    TranscriptionElongation, TranscriptionInitiation, TranscriptionTermination,
};
