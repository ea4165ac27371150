use crate::{error::Error, ident::IdStrategy, runtime::Database};
use relgen_schema::types::PropertyMap;
use serde_json::Value;
use std::fmt::{self, Display};

///
/// EventKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventKind {
    Created,
    Updated,
    Set,
    Reset,
    Deleted,
    Transferred,
}

impl EventKind {
    /// Name suffix per the event naming grammar.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Set => "Set",
            Self::Reset => "Reset",
            Self::Deleted => "Deleted",
            Self::Transferred => "Transferred",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

///
/// EventPayload
///
/// What an action emits and an applier consumes: the record's own id
/// (entity/plural kinds), the relation identifier properties, the written
/// data, and the target identifiers for transfers.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPayload {
    pub id: Option<String>,
    pub identifiers: PropertyMap,
    pub data: PropertyMap,
    pub to: PropertyMap,
}

impl EventPayload {
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

///
/// EventDef
///
/// Named state applier. Pure mapping from payload to exactly one store
/// mutation: the storage id is derived from the payload by the relation's
/// fixed id strategy, never generated. Appliers are replayable against the
/// materialized store.
///

#[derive(Clone, Debug)]
pub struct EventDef {
    pub name: String,
    pub model: String,
    pub kind: EventKind,
    pub id_strategy: IdStrategy,
    /// Declared default values, the baseline a Reset reverts to.
    pub defaults: PropertyMap,
}

impl EventDef {
    /// Apply the event to the store.
    pub fn apply(&self, db: &mut dyn Database, payload: &EventPayload) -> Result<(), Error> {
        let id = self.storage_id(payload)?;

        match self.kind {
            EventKind::Created | EventKind::Set => {
                db.put(&self.model, &id, self.build_record(payload, &id));
            }
            EventKind::Updated => {
                db.merge(&self.model, &id, self.build_record(payload, &id));
            }
            EventKind::Reset => {
                // Identifiers survive a reset; everything else reverts to
                // the declared defaults.
                let mut record = self.defaults.clone();
                for (name, value) in &payload.identifiers {
                    record.insert(name.clone(), value.clone());
                }
                db.put(&self.model, &id, record);
            }
            EventKind::Deleted => {
                db.remove(&self.model, &id);
            }
            EventKind::Transferred => self.apply_transfer(db, payload, &id)?,
        }

        Ok(())
    }

    fn apply_transfer(
        &self,
        db: &mut dyn Database,
        payload: &EventPayload,
        id: &str,
    ) -> Result<(), Error> {
        match &self.id_strategy {
            // Records keyed by their own id stay in place; only the
            // ownership fields are rewritten.
            IdStrategy::ModelProperty(_) => {
                db.merge(&self.model, id, payload.to.clone());

                Ok(())
            }
            // Records keyed by the owner move to the new composite id.
            IdStrategy::Composite(_) | IdStrategy::AnyComposite(_) => {
                let to_id = self.id_strategy.id_for(&payload.to)?;

                db.transfer(&self.model, id, &to_id, payload.to.clone())
            }
        }
    }

    fn storage_id(&self, payload: &EventPayload) -> Result<String, Error> {
        match &self.id_strategy {
            IdStrategy::ModelProperty(_) => payload
                .id
                .clone()
                .ok_or_else(|| Error::config(format!("event {} payload carries no id", self.name))),
            strategy => strategy.id_for(&payload.identifiers),
        }
    }

    fn build_record(&self, payload: &EventPayload, id: &str) -> PropertyMap {
        let mut record = payload.data.clone();
        for (name, value) in &payload.identifiers {
            record.insert(name.clone(), value.clone());
        }
        if matches!(self.id_strategy, IdStrategy::ModelProperty(_)) {
            record.insert("id".to_string(), Value::String(id.to_string()));
        }

        record
    }
}
