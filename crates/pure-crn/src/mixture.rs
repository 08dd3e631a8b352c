//! Mixtures gather components and compile them into a species set, reactions and parameters.

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use pure_core::errors::{ErrorInfo, PureError};

use crate::component::Component;
use crate::mechanism::{Mechanism, MechanismKind};
use crate::model::{ModelDescription, ReactionDescription, TermDescription};
use crate::parameter::ParameterStore;
use crate::reaction::{Reaction, StoichiometricTerm};
use crate::species::Species;

/// Policy applied when a mechanism kind is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterPolicy {
    /// Fail with `mechanism-exists`.
    #[default]
    Reject,
    /// Replace the registered mechanism.
    Overwrite,
}

/// Container of named components and one mechanism per kind.
#[derive(Debug)]
pub struct Mixture {
    name: String,
    components: IndexMap<String, Component>,
    mechanisms: BTreeMap<MechanismKind, Box<dyn Mechanism>>,
    parameters: ParameterStore,
}

/// Network materialised from a mixture: flattened species and reactions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalReactionNetwork {
    /// Name inherited from the mixture.
    pub name: String,
    /// Species in first-declaration order, without duplicates.
    pub species: Vec<Species>,
    /// Reactions in emission order, without duplicates.
    pub reactions: Vec<Reaction>,
}

impl Mixture {
    /// Creates an empty mixture.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: IndexMap::new(),
            mechanisms: BTreeMap::new(),
            parameters: ParameterStore::new(),
        }
    }

    /// Mixture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a component; component names are unique.
    pub fn add_component(&mut self, component: Component) -> Result<(), PureError> {
        if self.components.contains_key(component.name()) {
            return Err(PureError::Model(
                ErrorInfo::new(
                    "component-exists",
                    format!("mixture already has a component named {}", component.name()),
                )
                .with_context("mixture", self.name.clone())
                .with_context("component", component.name()),
            ));
        }
        self.components
            .insert(component.name().to_string(), component);
        Ok(())
    }

    /// Registers several components in order.
    pub fn add_components<I>(&mut self, components: I) -> Result<(), PureError>
    where
        I: IntoIterator<Item = Component>,
    {
        for component in components {
            self.add_component(component)?;
        }
        Ok(())
    }

    /// Looks a component up by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Components in registration order.
    pub fn components(&self) -> impl ExactSizeIterator<Item = &Component> {
        self.components.values()
    }

    /// Registers a mechanism under its kind.
    pub fn add_mechanism(
        &mut self,
        mechanism: Box<dyn Mechanism>,
        policy: RegisterPolicy,
    ) -> Result<(), PureError> {
        let kind = mechanism.kind();
        if policy == RegisterPolicy::Reject && self.mechanisms.contains_key(&kind) {
            return Err(PureError::Model(
                ErrorInfo::new(
                    "mechanism-exists",
                    format!("mixture already has a {kind} mechanism"),
                )
                .with_context("mixture", self.name.clone())
                .with_context("kind", kind.as_str())
                .with_hint("register with RegisterPolicy::Overwrite to replace it"),
            ));
        }
        self.mechanisms.insert(kind, mechanism);
        Ok(())
    }

    /// Mechanism registered under `kind`.
    pub fn mechanism(&self, kind: MechanismKind) -> Option<&dyn Mechanism> {
        self.mechanisms.get(&kind).map(|boxed| &**boxed)
    }

    /// Registered mechanisms keyed by kind.
    pub fn mechanisms(&self) -> impl Iterator<Item = (MechanismKind, &dyn Mechanism)> {
        self.mechanisms
            .iter()
            .map(|(kind, mechanism)| (*kind, &**mechanism))
    }

    /// Parameter store used during compilation.
    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    /// Mutable access to the parameter store.
    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    /// Materialises the network for the given templates.
    ///
    /// Component species come first. Each implemented mechanism is then
    /// invoked for every template, with parameters resolved for the
    /// template's name as part id.
    pub fn compile(&self, templates: &[Species]) -> Result<ChemicalReactionNetwork, PureError> {
        let mut species: IndexSet<Species> = self
            .components
            .values()
            .map(|component| component.species().clone())
            .collect();
        let mut reactions: Vec<Reaction> = Vec::new();

        for template in templates {
            for mechanism in self.mechanisms.values() {
                if !mechanism.is_implemented() {
                    continue;
                }
                species.extend(mechanism.update_species(template)?);
                let resolver = self
                    .parameters
                    .resolver(mechanism.name(), Some(template.name()));
                for reaction in mechanism.update_reactions(template, &resolver)? {
                    if !reactions.contains(&reaction) {
                        reactions.push(reaction);
                    }
                }
            }
        }
        for reaction in &reactions {
            for item in reaction.species() {
                species.insert(item.clone());
            }
        }
        debug!(
            "compiled mixture {} into {} species and {} reactions",
            self.name,
            species.len(),
            reactions.len()
        );
        Ok(ChemicalReactionNetwork {
            name: self.name.clone(),
            species: species.into_iter().collect(),
            reactions,
        })
    }
}

fn describe_terms(terms: &[StoichiometricTerm]) -> Vec<TermDescription> {
    terms
        .iter()
        .map(|term| TermDescription {
            species: term.species.identifier(),
            multiplicity: term.multiplicity,
        })
        .collect()
}

impl ChemicalReactionNetwork {
    /// Exports the network as a model description with zero initial
    /// concentrations.
    ///
    /// Two reactions that map to the same model parameter must agree on its
    /// value, otherwise the export fails with `parameter-conflict`.
    pub fn to_model_description(&self) -> Result<ModelDescription, PureError> {
        let mut model = ModelDescription::new(self.name.clone());
        for species in &self.species {
            model.add_species(species.identifier(), 0.0);
        }
        for reaction in &self.reactions {
            let parameter = reaction.k_forward();
            let model_name = parameter.model_name();
            match model.parameters().get(&model_name) {
                Some(existing) if existing.to_bits() != parameter.value.to_bits() => {
                    return Err(PureError::Model(
                        ErrorInfo::new(
                            "parameter-conflict",
                            format!("parameter {model_name} resolved to two different values"),
                        )
                        .with_context("parameter", model_name.clone())
                        .with_context("first", existing.to_string())
                        .with_context("second", parameter.value.to_string()),
                    ));
                }
                Some(_) => {}
                None => model.add_parameter(model_name.clone(), parameter.value),
            }
            model.add_reaction(ReactionDescription {
                reactants: describe_terms(reaction.reactants()),
                products: describe_terms(reaction.products()),
                rate_parameter: model_name,
            })?;
        }
        Ok(model)
    }
}
