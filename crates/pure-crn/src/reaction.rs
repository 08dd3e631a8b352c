//! Mass-action reactions and their propensity terms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameter::Parameter;
use crate::species::Species;

/// Species together with its stoichiometric multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoichiometricTerm {
    /// Participating species.
    pub species: Species,
    /// Number of copies consumed or produced.
    pub multiplicity: u32,
}

/// Mass-action rate law with a single forward constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassAction {
    /// Forward rate constant.
    pub k_forward: Parameter,
}

/// Irreversible mass-action reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    reactants: Vec<StoichiometricTerm>,
    products: Vec<StoichiometricTerm>,
    rate: MassAction,
}

impl Reaction {
    /// Builds a mass-action reaction.
    ///
    /// Repeated species in either list collapse into a single term whose
    /// multiplicity counts the repeats; first-occurrence order is kept.
    pub fn mass_action(reactants: &[Species], products: &[Species], k_forward: Parameter) -> Self {
        Self {
            reactants: collapse(reactants),
            products: collapse(products),
            rate: MassAction { k_forward },
        }
    }

    /// Reactant terms.
    pub fn reactants(&self) -> &[StoichiometricTerm] {
        &self.reactants
    }

    /// Product terms.
    pub fn products(&self) -> &[StoichiometricTerm] {
        &self.products
    }

    /// Forward rate parameter.
    pub fn k_forward(&self) -> &Parameter {
        &self.rate.k_forward
    }

    /// Whether the reaction has no products.
    pub fn is_degradation(&self) -> bool {
        self.products.is_empty()
    }

    /// Every species touched by the reaction, reactants first.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|term| &term.species)
    }
}

fn collapse(species: &[Species]) -> Vec<StoichiometricTerm> {
    let mut terms: Vec<StoichiometricTerm> = Vec::with_capacity(species.len());
    for item in species {
        match terms.iter_mut().find(|term| &term.species == item) {
            Some(term) => term.multiplicity += 1,
            None => terms.push(StoichiometricTerm {
                species: item.clone(),
                multiplicity: 1,
            }),
        }
    }
    terms
}

fn write_side(f: &mut fmt::Formatter<'_>, terms: &[StoichiometricTerm]) -> fmt::Result {
    for (idx, term) in terms.iter().enumerate() {
        if idx > 0 {
            write!(f, " + ")?;
        }
        if term.multiplicity > 1 {
            write!(f, "{} ", term.multiplicity)?;
        }
        write!(f, "{}", term.species)?;
    }
    Ok(())
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.reactants)?;
        write!(f, " --> ")?;
        write_side(f, &self.products)?;
        write!(f, " ({}={})", self.rate.k_forward.name, self.rate.k_forward.value)
    }
}
