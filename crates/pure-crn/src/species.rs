//! Chemical species identified by material type and name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural kind of a species.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SpeciesKind {
    /// A single named chemical entity.
    Simple,
    /// An aggregate of constituent species, kept sorted.
    Complex {
        /// Constituents in canonical order (duplicates retained).
        parts: Vec<Species>,
    },
}

/// Named chemical entity participating in a reaction network.
///
/// Simple species are identified by `material_name` (or `name` when no
/// material is set). Complexes derive their identity from their
/// constituents: two complexes assembled from the same species in any order
/// compare equal and share an identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Species {
    name: String,
    material: Option<String>,
    kind: SpeciesKind,
}

impl Species {
    /// Creates a simple species without a material type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            kind: SpeciesKind::Simple,
        }
    }

    /// Creates a simple species tagged with a material type.
    pub fn with_material(material: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: Some(material.into()),
            kind: SpeciesKind::Simple,
        }
    }

    /// Creates a protein species.
    pub fn protein(name: impl Into<String>) -> Self {
        Self::with_material("protein", name)
    }

    /// Creates a DNA species (transcription template).
    pub fn dna(name: impl Into<String>) -> Self {
        Self::with_material("dna", name)
    }

    /// Creates a complex from its constituent species.
    pub fn complex<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Species>,
    {
        let mut parts: Vec<Species> = parts.into_iter().collect();
        parts.sort();
        let name = parts
            .iter()
            .map(Species::identifier)
            .collect::<Vec<_>>()
            .join("_");
        Self {
            name,
            material: Some("complex".to_string()),
            kind: SpeciesKind::Complex { parts },
        }
    }

    /// Returns the bare species name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the material type, if any.
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Returns the structural kind of the species.
    pub fn kind(&self) -> &SpeciesKind {
        &self.kind
    }

    /// Whether the species is a complex of other species.
    pub fn is_complex(&self) -> bool {
        matches!(self.kind, SpeciesKind::Complex { .. })
    }

    /// Constituents of a complex; empty for simple species.
    pub fn parts(&self) -> &[Species] {
        match &self.kind {
            SpeciesKind::Simple => &[],
            SpeciesKind::Complex { parts } => parts,
        }
    }

    /// Unique identifier used as the species key in model descriptions.
    pub fn identifier(&self) -> String {
        match &self.material {
            Some(material) => format!("{material}_{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}
