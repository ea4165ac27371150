use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    ops::Not,
};

///
/// IndexDef
///
/// Secondary index over an ordered field list. Field order is significant;
/// an index keyed by the identifier property set of a relation enables
/// lookup of all instances sharing an owner.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexDef {
    pub name: String,
    pub fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub unique: bool,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            unique: false,
        }
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.fields.len() < other.fields.len() && other.fields.starts_with(&self.fields)
    }
}

impl Display for IndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.join(", ");

        if self.unique {
            write!(f, "UNIQUE ({fields})")
        } else {
            write!(f, "({fields})")
        }
    }
}
