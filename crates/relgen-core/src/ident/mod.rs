pub mod codec;

pub use codec::{AnyRef, ID_CODEC_VERSION, ID_SEPARATOR};

use crate::error::Error;
use codec::encode_parts;
use relgen_schema::types::PropertyMap;
use serde_json::Value;

/// Project the named properties out of a bag, in declaration order.
/// Fails if any named property is absent.
pub fn extract_id_parts(names: &[String], properties: &PropertyMap) -> Result<Vec<Value>, Error> {
    names
        .iter()
        .map(|name| {
            properties
                .get(name)
                .cloned()
                .ok_or_else(|| Error::missing_property(name.clone()))
        })
        .collect()
}

/// Copy the named identifier properties into a fresh bag.
pub fn extract_identifiers(
    names: &[String],
    properties: &PropertyMap,
) -> Result<PropertyMap, Error> {
    let mut out = PropertyMap::new();
    for name in names {
        let value = properties
            .get(name)
            .cloned()
            .ok_or_else(|| Error::missing_property(name.clone()))?;
        out.insert(name.clone(), value);
    }

    Ok(out)
}

/// Composite id for a fixed relation: the named properties in declaration
/// order, encoded by the v1 codec. Deterministic and order-sensitive.
pub fn generate_id(names: &[String], properties: &PropertyMap) -> Result<String, Error> {
    encode_parts(&extract_id_parts(names, properties)?)
}

/// Composite id for an any relation: every role contributes its type tag
/// and its id, so the result is self-describing. Always multi-part, so the
/// full join grammar applies even for a single role.
pub fn generate_any_id(roles: &[String], properties: &PropertyMap) -> Result<String, Error> {
    let mut parts = Vec::with_capacity(roles.len() * 2);
    for role in roles {
        let type_name = format!("{role}Type");
        parts.push(
            properties
                .get(&type_name)
                .cloned()
                .ok_or_else(|| Error::missing_property(type_name.clone()))?,
        );
        parts.push(
            properties
                .get(role)
                .cloned()
                .ok_or_else(|| Error::missing_property(role.clone()))?,
        );
    }
    if parts.is_empty() {
        return Err(Error::config("any identifier needs at least one role"));
    }

    let encoded: Result<Vec<String>, Error> = parts.iter().map(codec::encode_part).collect();

    Ok(encoded?.join(&ID_SEPARATOR.to_string()))
}

/// Extract the writable subset of an input bag, falling back to `base`
/// (declared defaults on create, the existing record on update) for
/// properties the input omits. Properties absent from both stay absent.
#[must_use]
pub fn extract_object_data(
    writable: &[String],
    properties: &PropertyMap,
    base: &PropertyMap,
) -> PropertyMap {
    let mut out = PropertyMap::new();
    for name in writable {
        if let Some(value) = properties.get(name).or_else(|| base.get(name)) {
            out.insert(name.clone(), value.clone());
        }
    }

    out
}

///
/// IdStrategy
///
/// How a generated artifact derives a storage id from a property bag.
/// Fixed per relation at compile time; appliers reuse it verbatim so event
/// replay lands on the same ids.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IdStrategy {
    /// The id is the bag value under the model property name (entity and
    /// plural relations, where records carry their own id).
    ModelProperty(String),
    /// Composite id over fixed owner-reference properties.
    Composite(Vec<String>),
    /// Composite id over any-role properties (type tag + id per role).
    AnyComposite(Vec<String>),
}

impl IdStrategy {
    /// Derive the storage id from a bag of identifier properties.
    pub fn id_for(&self, properties: &PropertyMap) -> Result<String, Error> {
        match self {
            Self::ModelProperty(name) => match properties.get(name) {
                Some(Value::String(id)) => Ok(id.clone()),
                Some(other) => encode_parts(std::slice::from_ref(other)),
                None => Err(Error::missing_property(name.clone())),
            },
            Self::Composite(names) => generate_id(names, properties),
            Self::AnyComposite(roles) => generate_any_id(roles, properties),
        }
    }
}
