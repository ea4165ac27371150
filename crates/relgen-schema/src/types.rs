use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// PropertyMap
///
/// Runtime bag of property values. Keys are property names; values are
/// plain JSON values so bags round-trip through payloads unchanged.
///

pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

///
/// Operation
///
/// The per-operation axis used by access rules and generated artifacts.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    Set,
    Reset,
}

impl Operation {
    /// Lower-case verb used in generated action names.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Set => "set",
            Self::Reset => "reset",
        }
    }

    /// Whether the operation mutates stored state.
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}
