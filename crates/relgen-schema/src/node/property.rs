use serde::{Deserialize, Serialize};
use serde_json::Value;

///
/// PropertyType
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PropertyType {
    Text,
    Bool,
    Int,
    Float,
    Timestamp,
    Object,
    /// Reference to a fixed model.
    Ref(String),
    /// Reference to an open-ended ("any") target; the concrete model is
    /// carried next to the value as a type tag property.
    AnyRef,
}

///
/// ValidationRule
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ValidationRule {
    NonEmpty,
    MaxLength(usize),
}

impl ValidationRule {
    /// Stable rule name reported in field issues.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NonEmpty => "nonEmpty",
            Self::MaxLength(_) => "maxLength",
        }
    }
}

///
/// PropertyDef
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PropertyDef {
    pub ty: PropertyType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertyDef {
    #[must_use]
    pub const fn new(ty: PropertyType) -> Self {
        Self {
            ty,
            validation: Vec::new(),
            default: None,
        }
    }

    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.validation.push(ValidationRule::NonEmpty);
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

///
/// Property
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub def: PropertyDef,
}

impl Property {
    pub fn new(name: impl Into<String>, def: PropertyDef) -> Self {
        Self {
            name: name.into(),
            def,
        }
    }
}

///
/// PropertySet
///
/// Ordered property list. Declaration order is authoritative: identifier
/// derivation, indexes, and generated action inputs all reuse it verbatim.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PropertySet(Vec<Property>);

impl PropertySet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, property: Property) {
        self.0.push(property);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.0.iter().find(|p| p.name == name).map(|p| &p.def)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Property names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Property> for PropertySet {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
