use crate::{access::EffectiveAccess, error::Error, ident::IdStrategy};
use relgen_schema::{node::PropertySet, types::PropertyMap};
use serde_json::Value;

///
/// DaoPath
///
/// Storage path computed by a view: one record (optionally field-limited)
/// or a range of records sharing an owner key.
///

#[derive(Clone, Debug, PartialEq)]
pub enum DaoPath {
    Record {
        model: String,
        id: String,
        fields: Option<Vec<String>>,
    },
    Range {
        model: String,
        key: Vec<(String, Value)>,
        sort: Vec<String>,
    },
}

///
/// ViewTarget
///

#[derive(Clone, Debug)]
pub enum ViewTarget {
    /// Single stored record addressed by the relation's id strategy.
    Record(IdStrategy),
    /// All records sharing the identifier key, ordered by sort fields
    /// (ties break by insertion order).
    Range {
        key_properties: Vec<String>,
        sort: Vec<String>,
    },
}

///
/// ViewDef
///
/// Named read projection: query-key input properties mapped to a storage
/// path, optionally limited to a field subset.
///

#[derive(Clone, Debug)]
pub struct ViewDef {
    pub name: String,
    pub model: String,
    pub input: PropertySet,
    pub target: ViewTarget,
    pub fields: Option<Vec<String>>,
    pub access: Option<EffectiveAccess>,
}

impl ViewDef {
    /// Compute the storage path for a query input. Every input property is
    /// required non-empty; the id grammar is the relation's.
    pub fn dao_path(&self, input: &PropertyMap) -> Result<DaoPath, Error> {
        for property in &self.input {
            match input.get(&property.name) {
                None | Some(Value::Null) => {
                    return Err(Error::missing_property(property.name.clone()));
                }
                Some(Value::String(s)) if s.is_empty() => {
                    return Err(Error::missing_property(property.name.clone()));
                }
                Some(_) => {}
            }
        }

        match &self.target {
            ViewTarget::Record(strategy) => Ok(DaoPath::Record {
                model: self.model.clone(),
                id: strategy.id_for(input)?,
                fields: self.fields.clone(),
            }),
            ViewTarget::Range {
                key_properties,
                sort,
            } => {
                let mut key = Vec::with_capacity(key_properties.len());
                for name in key_properties {
                    let value = input
                        .get(name)
                        .cloned()
                        .ok_or_else(|| Error::missing_property(name.clone()))?;
                    key.push((name.clone(), value));
                }

                Ok(DaoPath::Range {
                    model: self.model.clone(),
                    key,
                    sort: sort.clone(),
                })
            }
        }
    }
}
