//! Capability-checked CRN building blocks.

use crate::component::Component;
use crate::parameter::Parameter;
use crate::reaction::Reaction;
use crate::species::Species;

/// Any building block of a reaction network.
///
/// Mechanism constructors accept `CrnObject` so that the species capability
/// is checked at the call boundary: a component or a parameter handed over
/// where a species belongs is rejected with a validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum CrnObject {
    /// A species.
    Species(Species),
    /// A mixture component (wraps a species but is not one).
    Component(Component),
    /// A rate parameter.
    Parameter(Parameter),
    /// A reaction.
    Reaction(Reaction),
}

impl CrnObject {
    /// Returns the species if the object has the species capability.
    pub fn as_species(&self) -> Option<&Species> {
        match self {
            CrnObject::Species(species) => Some(species),
            _ => None,
        }
    }

    /// Consumes the object, returning the species if it is one.
    pub fn into_species(self) -> Result<Species, CrnObject> {
        match self {
            CrnObject::Species(species) => Ok(species),
            other => Err(other),
        }
    }

    /// Short description of the object's kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CrnObject::Species(_) => "species",
            CrnObject::Component(_) => "component",
            CrnObject::Parameter(_) => "parameter",
            CrnObject::Reaction(_) => "reaction",
        }
    }
}

impl From<Species> for CrnObject {
    fn from(value: Species) -> Self {
        CrnObject::Species(value)
    }
}

impl From<Component> for CrnObject {
    fn from(value: Component) -> Self {
        CrnObject::Component(value)
    }
}

impl From<Parameter> for CrnObject {
    fn from(value: Parameter) -> Self {
        CrnObject::Parameter(value)
    }
}

impl From<Reaction> for CrnObject {
    fn from(value: Reaction) -> Self {
        CrnObject::Reaction(value)
    }
}
