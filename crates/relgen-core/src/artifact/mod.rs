pub mod action;
pub mod event;
pub mod view;

pub use action::{ActionDef, ActionKind, Event};
pub use event::{EventDef, EventKind, EventPayload};
pub use view::{DaoPath, ViewDef};

use crate::{access::EffectiveAccess, augment::SchemaChanges, error::Error, obs};
use relgen_schema::types::Operation;
use std::collections::BTreeMap;

///
/// Artifacts
///
/// Explicit output of one (model, annotation) compilation. The caller
/// merges artifacts into the service and applies the schema changes to the
/// registry; compilers never mutate shared state themselves.
///

#[derive(Debug, Default)]
pub struct Artifacts {
    pub schema: SchemaChanges,
    pub views: Vec<ViewDef>,
    pub events: Vec<EventDef>,
    pub actions: Vec<ActionDef>,
    pub access: Vec<EffectiveAccess>,
}

impl Artifacts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another artifact set into this one.
    pub fn extend(&mut self, other: Self) {
        self.schema.extend(other.schema);
        self.views.extend(other.views);
        self.events.extend(other.events);
        self.actions.extend(other.actions);
        self.access.extend(other.access);
    }
}

///
/// Service
///
/// The merged registries of generated artifacts. Unlike the transient
/// compilation contexts these persist for the lifetime of the running
/// service; interoperating clients address them by the derived names.
///

#[derive(Debug, Default)]
pub struct Service {
    views: BTreeMap<String, ViewDef>,
    events: BTreeMap<String, EventDef>,
    actions: BTreeMap<String, ActionDef>,
    access: BTreeMap<(String, Operation), Vec<EffectiveAccess>>,
}

impl Service {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            views: BTreeMap::new(),
            events: BTreeMap::new(),
            actions: BTreeMap::new(),
            access: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn view(&self, name: &str) -> Option<&ViewDef> {
        self.views.get(name)
    }

    #[must_use]
    pub fn event(&self, name: &str) -> Option<&EventDef> {
        self.events.get(name)
    }

    #[must_use]
    pub fn action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.get(name)
    }

    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Effective access entries registered for (model, operation). Access
    /// chains consult these when resolving inherited grants.
    #[must_use]
    pub fn access_for(&self, model: &str, op: Operation) -> &[EffectiveAccess] {
        self.access
            .get(&(model.to_string(), op))
            .map_or(&[], Vec::as_slice)
    }

    pub fn register_access(&mut self, access: EffectiveAccess) {
        self.access
            .entry((access.model.clone(), access.op))
            .or_default()
            .push(access);
    }

    /// Merge compiled artifacts. Generated names are service-unique; a
    /// collision means two annotations derived the same name and is a
    /// configuration error.
    pub fn merge(&mut self, artifacts: Artifacts) -> Result<(), Error> {
        let (views, events, actions) = (
            artifacts.views.len(),
            artifacts.events.len(),
            artifacts.actions.len(),
        );

        for view in artifacts.views {
            if self.views.contains_key(&view.name) {
                return Err(Error::config(format!("duplicate view name: {}", view.name)));
            }
            self.views.insert(view.name.clone(), view);
        }
        for event in artifacts.events {
            if self.events.contains_key(&event.name) {
                return Err(Error::config(format!(
                    "duplicate event name: {}",
                    event.name
                )));
            }
            self.events.insert(event.name.clone(), event);
        }
        for action in artifacts.actions {
            if self.actions.contains_key(&action.name) {
                return Err(Error::config(format!(
                    "duplicate action name: {}",
                    action.name
                )));
            }
            self.actions.insert(action.name.clone(), action);
        }
        for access in artifacts.access {
            self.register_access(access);
        }

        obs::sink::record(&obs::sink::CompileEvent::ServiceMerged {
            views,
            events,
            actions,
        });

        Ok(())
    }

    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.views.len(), self.events.len(), self.actions.len())
    }
}
