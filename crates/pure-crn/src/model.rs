//! Precompiled model description consumed by simulation and inference.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use pure_core::errors::{ErrorInfo, PureError};
use pure_core::{read_json, stable_hash_string, write_json, SchemaVersion};
use serde::{Deserialize, Serialize};

/// Species name with multiplicity inside a [`ReactionDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDescription {
    /// Species identifier.
    pub species: String,
    /// Stoichiometric multiplicity.
    pub multiplicity: u32,
}

impl TermDescription {
    /// Single-copy term.
    pub fn one(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            multiplicity: 1,
        }
    }
}

/// Mass-action reaction referencing species and parameters by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDescription {
    /// Consumed species.
    pub reactants: Vec<TermDescription>,
    /// Produced species.
    pub products: Vec<TermDescription>,
    /// Name of the forward rate parameter.
    pub rate_parameter: String,
}

/// Flattened network: species with concentrations, named parameters and
/// mass-action reactions.
///
/// Species and parameters keep their insertion order, which is the column
/// order of simulated trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    #[serde(default)]
    schema: SchemaVersion,
    name: String,
    species: IndexMap<String, f64>,
    parameters: IndexMap<String, f64>,
    reactions: Vec<ReactionDescription>,
}

fn model_error(code: &str, message: impl Into<String>) -> PureError {
    PureError::Model(ErrorInfo::new(code, message))
}

impl ModelDescription {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: SchemaVersion::default(),
            name: name.into(),
            species: IndexMap::new(),
            parameters: IndexMap::new(),
            reactions: Vec::new(),
        }
    }

    /// Loads a model from its JSON representation and validates references.
    pub fn load(path: &Path) -> Result<Self, PureError> {
        let model: ModelDescription = read_json(path)?;
        model.schema.ensure_readable()?;
        model.validate()?;
        Ok(model)
    }

    /// Writes the model as JSON.
    pub fn store(&self, path: &Path) -> Result<(), PureError> {
        write_json(path, self)
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a species with its initial concentration; re-adding overwrites.
    pub fn add_species(&mut self, name: impl Into<String>, initial: f64) {
        self.species.insert(name.into(), initial);
    }

    /// Adds a parameter; re-adding overwrites.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: f64) {
        self.parameters.insert(name.into(), value);
    }

    /// Adds a reaction whose species and rate parameter must already exist.
    pub fn add_reaction(&mut self, reaction: ReactionDescription) -> Result<(), PureError> {
        self.check_reaction(&reaction)?;
        self.reactions.push(reaction);
        Ok(())
    }

    /// Species and their current concentrations.
    pub fn species(&self) -> &IndexMap<String, f64> {
        &self.species
    }

    /// Parameters and their current values.
    pub fn parameters(&self) -> &IndexMap<String, f64> {
        &self.parameters
    }

    /// Reactions in declaration order.
    pub fn reactions(&self) -> &[ReactionDescription] {
        &self.reactions
    }

    /// Position of a species in the state vector.
    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species.get_index_of(name)
    }

    /// Current concentration of a species.
    pub fn species_value(&self, name: &str) -> Result<f64, PureError> {
        self.species.get(name).copied().ok_or_else(|| unknown_species(name))
    }

    /// Overwrites concentrations for every key in `values`.
    ///
    /// Species not named in `values` keep their current concentration. A key
    /// that names no species in the model is rejected before anything is
    /// written.
    pub fn set_species<'a, I>(&mut self, values: I) -> Result<(), PureError>
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let values: Vec<(&String, &f64)> = values.into_iter().collect();
        if let Some((missing, _)) = values
            .iter()
            .find(|(name, _)| !self.species.contains_key(name.as_str()))
        {
            return Err(unknown_species(missing));
        }
        for (name, value) in values {
            self.species.insert(name.clone(), *value);
        }
        Ok(())
    }

    /// Current value of a parameter.
    pub fn parameter(&self, name: &str) -> Result<f64, PureError> {
        self.parameters
            .get(name)
            .copied()
            .ok_or_else(|| unknown_parameter(name))
    }

    /// Overwrites a parameter value.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), PureError> {
        match self.parameters.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(unknown_parameter(name)),
        }
    }

    /// Multiplies every parameter by `factor`.
    pub fn scale_parameters(&mut self, factor: f64) {
        for value in self.parameters.values_mut() {
            *value *= factor;
        }
    }

    /// Checks that every reaction references declared species and parameters.
    pub fn validate(&self) -> Result<(), PureError> {
        for reaction in &self.reactions {
            self.check_reaction(reaction)?;
        }
        Ok(())
    }

    /// Stable hash of the full description.
    pub fn canonical_hash(&self) -> Result<String, PureError> {
        stable_hash_string(self)
    }

    /// Concentrations keyed by name in sorted order, for reports.
    pub fn species_snapshot(&self) -> BTreeMap<String, f64> {
        self.species
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }

    fn check_reaction(&self, reaction: &ReactionDescription) -> Result<(), PureError> {
        if !self.parameters.contains_key(&reaction.rate_parameter) {
            return Err(unknown_parameter(&reaction.rate_parameter));
        }
        for term in reaction.reactants.iter().chain(reaction.products.iter()) {
            if !self.species.contains_key(&term.species) {
                return Err(unknown_species(&term.species));
            }
            if term.multiplicity == 0 {
                return Err(model_error(
                    "zero-multiplicity",
                    format!("species {} has multiplicity 0", term.species),
                ));
            }
        }
        Ok(())
    }
}

fn unknown_species(name: &str) -> PureError {
    PureError::Model(
        ErrorInfo::new("unknown-species", format!("model has no species {name}"))
            .with_context("species", name),
    )
}

fn unknown_parameter(name: &str) -> PureError {
    PureError::Model(
        ErrorInfo::new("unknown-parameter", format!("model has no parameter {name}"))
            .with_context("parameter", name),
    )
}
