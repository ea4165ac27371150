use crate::node::{Model, RelationKind};
use std::collections::{BTreeMap, BTreeSet, btree_map};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("model already registered: {0}")]
    DuplicateModel(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("duplicated processing of {kind} annotation on model {model}")]
    AlreadyProcessed { model: String, kind: RelationKind },
}

///
/// ModelRegistry
///
/// The registry of model schemas the compiler scans. It also owns the
/// processed-marker set, so "compiled at most once per (model, kind)"
/// is enforced here instead of by flags stashed on the models.
///

#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Model>,
    processed: BTreeSet<(String, RelationKind)>,
}

impl ModelRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
            processed: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, model: Model) -> Result<(), RegistryError> {
        match self.models.entry(model.name.clone()) {
            btree_map::Entry::Occupied(entry) => {
                Err(RegistryError::DuplicateModel(entry.key().clone()))
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(model);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.models.get_mut(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Mark a (model, kind) pair processed. A second attempt for the same
    /// pair is a configuration error and leaves the registry unchanged.
    pub fn mark_processed(
        &mut self,
        model: &str,
        kind: RelationKind,
    ) -> Result<(), RegistryError> {
        if !self.models.contains_key(model) {
            return Err(RegistryError::UnknownModel(model.to_string()));
        }
        if !self.processed.insert((model.to_string(), kind)) {
            return Err(RegistryError::AlreadyProcessed {
                model: model.to_string(),
                kind,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn is_processed(&self, model: &str, kind: RelationKind) -> bool {
        self.processed.contains(&(model.to_string(), kind))
    }
}
