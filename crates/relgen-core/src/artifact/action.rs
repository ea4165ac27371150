use crate::{
    access::EffectiveAccess,
    artifact::event::{EventKind, EventPayload},
    error::Error,
    ident::{IdStrategy, extract_identifiers, extract_object_data},
    runtime::{Database, Runtime},
};
use relgen_schema::{
    node::{AccessRequest, PropertySet},
    types::{Operation, PropertyMap},
};
use serde_json::Value;

///
/// Event
///
/// The single emission of a successful action execution. Returning it as
/// the value (instead of exposing an emit callback) makes
/// exactly-one-event-per-action structural: a failing path never has one.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub payload: EventPayload,
}

///
/// ActionKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Set,
    Reset,
}

///
/// Existence
///
/// Per-operation existence precondition, enforced before validation and
/// emission.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Existence {
    MustExist,
    MustNotExist,
    Unchecked,
}

impl ActionKind {
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Set => "set",
            Self::Reset => "reset",
        }
    }

    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        match self {
            Self::Create => EventKind::Created,
            Self::Update => EventKind::Updated,
            Self::Delete => EventKind::Deleted,
            Self::Set => EventKind::Set,
            Self::Reset => EventKind::Reset,
        }
    }

    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Create => Operation::Create,
            Self::Update => Operation::Update,
            Self::Delete => Operation::Delete,
            Self::Set => Operation::Set,
            Self::Reset => Operation::Reset,
        }
    }

    /// Set is an upsert; everything else checks the target first.
    #[must_use]
    pub const fn precondition(self) -> Existence {
        match self {
            Self::Create => Existence::MustNotExist,
            Self::Update | Self::Delete | Self::Reset => Existence::MustExist,
            Self::Set => Existence::Unchecked,
        }
    }

    /// Whether the action writes payload data (and therefore validates).
    #[must_use]
    pub const fn writes_data(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Set)
    }
}

///
/// ActionDef
///
/// Named command handler. Execution derives the target id, enforces the
/// existence precondition, extracts the writable payload subset, runs the
/// validation pipeline, and only then returns its event. The host runtime
/// serializes executions sharing a `queued_by` key and applies the event
/// (synchronously when `wait_for_events` is set).
///

#[derive(Clone, Debug)]
pub struct ActionDef {
    pub name: String,
    pub model: String,
    pub kind: ActionKind,
    pub event_name: String,
    pub input: PropertySet,
    pub access: Option<EffectiveAccess>,
    /// Concurrency key: exactly the relation's identifier property set.
    pub queued_by: Vec<String>,
    pub wait_for_events: bool,
    pub id_strategy: IdStrategy,
    /// Identifier properties copied into the event payload.
    pub identifier_properties: Vec<String>,
    pub writable: Vec<String>,
    pub defaults: PropertyMap,
    /// Direct-entity create: mint a fresh opaque id when none supplied.
    pub fresh_id: bool,
    pub model_property_name: String,
}

impl ActionDef {
    /// Execute the command against the current store state.
    pub fn execute(
        &self,
        db: &dyn Database,
        rt: &Runtime<'_>,
        input: &PropertyMap,
    ) -> Result<Event, Error> {
        let id = self.target_id(rt, input)?;
        let existing = db.get(&self.model, &id);

        match self.kind.precondition() {
            Existence::MustExist if existing.is_none() => {
                return Err(Error::not_found(format!("{}:{id}", self.model)));
            }
            Existence::MustNotExist if existing.is_some() => {
                return Err(Error::already_exists(format!("{}:{id}", self.model)));
            }
            _ => {}
        }

        let data = match self.kind {
            ActionKind::Create | ActionKind::Set => {
                extract_object_data(&self.writable, input, &self.defaults)
            }
            ActionKind::Update => {
                let base = existing
                    .as_ref()
                    .ok_or_else(|| Error::not_found(format!("{}:{id}", self.model)))?;

                extract_object_data(&self.writable, input, base)
            }
            ActionKind::Delete | ActionKind::Reset => PropertyMap::new(),
        };

        if self.kind.writes_data() {
            rt.validation.validate(&self.name, &self.input, &data)?;
        }

        let identifiers = extract_identifiers(&self.identifier_properties, input)?;
        let payload = EventPayload {
            id: matches!(self.id_strategy, IdStrategy::ModelProperty(_)).then(|| id.clone()),
            identifiers,
            data,
            to: PropertyMap::new(),
        };

        Ok(Event {
            name: self.event_name.clone(),
            payload,
        })
    }

    /// Evaluate the composed access predicate for a caller. The host
    /// runtime calls this before `execute`.
    pub fn check_access(
        &self,
        req: &AccessRequest<'_>,
        record: Option<&PropertyMap>,
        service: &crate::artifact::Service,
    ) -> Result<(), Error> {
        let granted = self
            .access
            .as_ref()
            .is_some_and(|access| access.evaluate(req, record, service));

        if granted {
            Ok(())
        } else {
            Err(Error::access_denied(self.name.clone()))
        }
    }

    fn target_id(&self, rt: &Runtime<'_>, input: &PropertyMap) -> Result<String, Error> {
        if self.fresh_id {
            return Ok(match input.get(&self.model_property_name) {
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                _ => rt.uids.generate(),
            });
        }

        self.id_strategy.id_for(input)
    }
}
