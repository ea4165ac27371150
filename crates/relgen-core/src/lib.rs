//! Compilation engine for relgen: annotation scanning, identifier
//! derivation, schema augmentation, access composition, and the generated
//! view/event/action artifacts, with the common vocabulary exported via
//! the `prelude`.

pub mod access;
pub mod artifact;
pub mod augment;
pub mod compile;
pub mod context;
pub mod error;
pub mod ident;
pub mod memory;
pub mod obs;
pub mod runtime;
pub mod scanner;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        artifact::{
            ActionDef, ActionKind, Artifacts, DaoPath, Event, EventDef, EventKind, EventPayload,
            Service, ViewDef,
        },
        context::CompilationContext,
        error::Error,
        ident::IdStrategy,
        memory::MemoryDb,
        runtime::{
            Database, RuleValidator, Runtime, SequenceUids, UidSource, UlidSource,
            ValidationPipeline,
        },
        scanner::{process, process_all},
    };
    pub use relgen_schema::prelude::*;
}
