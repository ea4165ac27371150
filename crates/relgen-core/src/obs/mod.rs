//! Observability: compile-time telemetry and the sink abstraction.
//!
//! Compiler logic never touches the counter state directly; all
//! instrumentation flows through `CompileEvent` and `CompileSink`.

pub mod sink;

pub use sink::{CompileReport, CompileSink, compile_report, compile_reset_all, with_compile_sink};
