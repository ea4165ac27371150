//! relgen compiles declarative relation annotations on data-model schemas
//! into generated read views, idempotent state-mutation events, and
//! validated command actions.
//!
//! ## Crate layout
//! - `schema`: models, properties, indexes, relation annotations, access
//!   rules, the model registry, and registry validation.
//! - `core`: the compilation engine — identifier derivation, schema
//!   augmentation, access composition, per-kind compilers, generated
//!   artifacts, and the host-collaborator ports.
//!
//! The `prelude` module mirrors the surface a host service needs to declare
//! models, run the compiler, and execute the generated artifacts.

pub use relgen_core as core;
pub use relgen_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use relgen_core::error::Error;
pub use relgen_core::scanner::{process, process_all};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
}
