//! Declarative schema layer for relgen: models, properties, indexes,
//! relation annotations, access rules, and the model registry that the
//! compilation engine consumes.

pub mod error;
pub mod node;
pub mod registry;
pub mod types;
pub mod validate;

/// Maximum length for model identifiers.
pub const MAX_MODEL_NAME_LEN: usize = 64;

/// Maximum length for property identifiers.
pub const MAX_PROPERTY_NAME_LEN: usize = 64;

/// Maximum number of fields allowed in a derived index.
pub const MAX_INDEX_FIELDS: usize = 8;

use crate::{error::ErrorTree, registry::RegistryError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        node::*,
        registry::ModelRegistry,
        types::{Operation, PropertyMap},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}
