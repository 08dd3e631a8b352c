//! Components: the parts a mixture is assembled from and the mechanisms they carry.

use serde::{Deserialize, Serialize};

use crate::species::Species;

/// Functional role of a mixture component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Enzymatic machinery (RNA polymerase).
    Machinery,
    /// Active nucleotide triphosphates.
    Nucleotide,
    /// Small molecules released or consumed by the machinery.
    SmallMolecule,
}

impl Role {
    /// Stable string tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Machinery => "machinery",
            Role::Nucleotide => "nucleotide",
            Role::SmallMolecule => "small_molecule",
        }
    }
}

/// Named species wrapper owned by a mixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    name: String,
    species: Species,
    role: Option<Role>,
}

impl Component {
    /// Wraps an existing species; the component takes the species name.
    pub fn new(species: Species) -> Self {
        Self {
            name: species.name().to_string(),
            species,
            role: None,
        }
    }

    /// Creates a protein component.
    pub fn protein(name: impl Into<String>) -> Self {
        Self::new(Species::protein(name))
    }

    /// Returns the component with `role` assigned.
    pub fn with_role(mut self, role: Role) -> Self {
        self.set_role(role);
        self
    }

    /// Assigns the role, replacing any previous one.
    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying species.
    pub fn species(&self) -> &Species {
        &self.species
    }

    /// Role tag, if assigned.
    pub fn role(&self) -> Option<Role> {
        self.role
    }
}
