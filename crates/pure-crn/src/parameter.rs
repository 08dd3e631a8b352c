//! Layered kinetic parameters: keyed lookup with mechanism and part fallbacks, and the CSV loader.

use std::collections::BTreeMap;
use std::path::Path;

use pure_core::errors::{ErrorInfo, PureError};
use serde::{Deserialize, Serialize};

/// Lookup layer that produced a resolved parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterScope {
    /// Matched `(name, part_id, mechanism)` exactly.
    Part,
    /// Matched `(name, mechanism)` with no part.
    Mechanism,
    /// Matched the global default for `name`.
    Global,
}

/// Named rate constant resolved for a reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as referenced by mechanisms.
    pub name: String,
    /// Numeric value.
    pub value: f64,
    /// Layer the value was resolved from.
    pub scope: ParameterScope,
    /// Part identifier for part-scoped values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
}

impl Parameter {
    /// Creates a global parameter.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            scope: ParameterScope::Global,
            part_id: None,
        }
    }

    /// Name under which the parameter appears in a compiled model.
    ///
    /// Part-scoped values are suffixed with their part id so that two parts
    /// with distinct values never share a model parameter.
    pub fn model_name(&self) -> String {
        match (&self.scope, &self.part_id) {
            (ParameterScope::Part, Some(part)) => format!("{}_{}", self.name, part),
            _ => self.name.clone(),
        }
    }
}

/// Key of a stored parameter value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterKey {
    /// Parameter name.
    pub name: String,
    /// Optional part identifier (requires a mechanism).
    pub part_id: Option<String>,
    /// Optional mechanism name.
    pub mechanism: Option<String>,
}

impl ParameterKey {
    /// Key for a global default.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part_id: None,
            mechanism: None,
        }
    }

    /// Key for a mechanism-wide value.
    pub fn mechanism(mechanism: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part_id: None,
            mechanism: Some(mechanism.into()),
        }
    }

    /// Key for a value specific to one part under one mechanism.
    pub fn part(
        mechanism: impl Into<String>,
        part_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            part_id: Some(part_id.into()),
            mechanism: Some(mechanism.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParameterRow {
    mechanism_id: Option<String>,
    part_id: Option<String>,
    param_name: String,
    param_val: f64,
}

/// Parameter values keyed by `(name, part_id, mechanism)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterStore {
    entries: BTreeMap<ParameterKey, f64>,
}

impl ParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: ParameterKey, value: f64) {
        self.entries.insert(key, value);
    }

    /// Sets a global default.
    pub fn set_global(&mut self, name: impl Into<String>, value: f64) {
        self.insert(ParameterKey::global(name), value);
    }

    /// Sets a mechanism-wide value.
    pub fn set_for_mechanism(
        &mut self,
        mechanism: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) {
        self.insert(ParameterKey::mechanism(mechanism, name), value);
    }

    /// Sets a value for one part under one mechanism.
    pub fn set_for_part(
        &mut self,
        mechanism: impl Into<String>,
        part_id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) {
        self.insert(ParameterKey::part(mechanism, part_id, name), value);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges `other` into `self`; entries of `other` win.
    pub fn extend(&mut self, other: ParameterStore) {
        self.entries.extend(other.entries);
    }

    /// Loads a parameter table with header `mechanism_id,part_id,param_name,param_val`.
    ///
    /// Empty `mechanism_id`/`part_id` cells leave that key component unset.
    /// A row naming a part without a mechanism cannot be reached by the
    /// layered lookup and is rejected.
    pub fn from_csv(path: &Path) -> Result<Self, PureError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|err| wrap_csv("parameter-open", path, err))?;
        let mut store = Self::new();
        for (index, row) in reader.deserialize::<ParameterRow>().enumerate() {
            let row = row.map_err(|err| {
                PureError::Data(
                    ErrorInfo::new("parameter-row", err.to_string())
                        .with_path(path)
                        .with_context("row", (index + 1).to_string()),
                )
            })?;
            let key = match (row.mechanism_id, row.part_id) {
                (Some(mechanism), Some(part)) => ParameterKey::part(mechanism, part, row.param_name),
                (Some(mechanism), None) => ParameterKey::mechanism(mechanism, row.param_name),
                (None, None) => ParameterKey::global(row.param_name),
                (None, Some(part)) => {
                    return Err(PureError::Data(
                        ErrorInfo::new("parameter-row", "part_id given without mechanism_id")
                            .with_path(path)
                            .with_context("row", (index + 1).to_string())
                            .with_context("part_id", part),
                    ));
                }
            };
            store.insert(key, row.param_val);
        }
        Ok(store)
    }

    /// Binds the store to a mechanism and optional part for resolution.
    pub fn resolver<'a>(
        &'a self,
        mechanism: &'a str,
        part_id: Option<&'a str>,
    ) -> ParameterResolver<'a> {
        ParameterResolver {
            store: self,
            mechanism,
            part_id,
        }
    }

    fn lookup(&self, name: &str, part_id: Option<&str>, mechanism: Option<&str>) -> Option<f64> {
        let key = ParameterKey {
            name: name.to_string(),
            part_id: part_id.map(str::to_string),
            mechanism: mechanism.map(str::to_string),
        };
        self.entries.get(&key).copied()
    }
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> PureError {
    PureError::Data(
        ErrorInfo::new(code, "failed to read parameter table")
            .with_path(path)
            .with_hint(err.to_string()),
    )
}

/// Parameter store bound to one mechanism and (optionally) one part.
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver<'a> {
    store: &'a ParameterStore,
    mechanism: &'a str,
    part_id: Option<&'a str>,
}

impl<'a> ParameterResolver<'a> {
    /// Mechanism the resolver is bound to.
    pub fn mechanism(&self) -> &str {
        self.mechanism
    }

    /// Part the resolver is bound to.
    pub fn part_id(&self) -> Option<&str> {
        self.part_id
    }

    /// Resolves `name` trying the part layer, then the mechanism layer, then
    /// the global default.
    pub fn resolve(&self, name: &str) -> Result<Parameter, PureError> {
        if let Some(part) = self.part_id {
            if let Some(value) = self.store.lookup(name, Some(part), Some(self.mechanism)) {
                return Ok(Parameter {
                    name: name.to_string(),
                    value,
                    scope: ParameterScope::Part,
                    part_id: Some(part.to_string()),
                });
            }
        }
        if let Some(value) = self.store.lookup(name, None, Some(self.mechanism)) {
            return Ok(Parameter {
                name: name.to_string(),
                value,
                scope: ParameterScope::Mechanism,
                part_id: None,
            });
        }
        if let Some(value) = self.store.lookup(name, None, None) {
            return Ok(Parameter::new(name, value));
        }
        let mut info = ErrorInfo::new("parameter-missing", format!("no value for parameter {name}"))
            .with_context("parameter", name)
            .with_context("mechanism", self.mechanism);
        if let Some(part) = self.part_id {
            info = info.with_context("part_id", part);
        }
        Err(PureError::Model(info))
    }
}
