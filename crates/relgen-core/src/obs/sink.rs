//! Compile-metrics sink boundary.
//!
//! This module is the only bridge between compiler logic and the
//! counter state. Tests install a scoped sink override to capture
//! events without touching the process-local counters.

use relgen_schema::node::RelationKind;
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn CompileSink>> = const { RefCell::new(None) };
    static STATE: RefCell<CompileReport> = RefCell::new(CompileReport::default());
}

///
/// CompileEvent
///

#[derive(Clone, Debug)]
pub enum CompileEvent {
    /// One (model, annotation) pair finished compiling.
    AnnotationCompiled {
        model: String,
        kind: RelationKind,
        views: usize,
        events: usize,
        actions: usize,
    },
    /// One artifact set was merged into the service.
    ServiceMerged {
        views: usize,
        events: usize,
        actions: usize,
    },
}

///
/// CompileSink
///

pub trait CompileSink {
    fn record(&self, event: &CompileEvent);
}

///
/// CompileReport
///
/// Process-local counters, snapshotted for endpoint/test plumbing.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompileReport {
    pub annotations_compiled: u64,
    pub views_generated: u64,
    pub events_generated: u64,
    pub actions_generated: u64,
    pub merges: u64,
    /// Compiled-annotation counts keyed by annotation name.
    pub per_kind: BTreeMap<String, u64>,
}

/// GlobalCompileSink
/// Default sink that writes into the counter state. Acts as the concrete
/// sink when no scoped override is installed.

struct GlobalCompileSink;

impl CompileSink for GlobalCompileSink {
    fn record(&self, event: &CompileEvent) {
        STATE.with_borrow_mut(|state| match event {
            CompileEvent::AnnotationCompiled {
                kind,
                views,
                events,
                actions,
                ..
            } => {
                state.annotations_compiled = state.annotations_compiled.saturating_add(1);
                state.views_generated = state.views_generated.saturating_add(*views as u64);
                state.events_generated = state.events_generated.saturating_add(*events as u64);
                state.actions_generated = state.actions_generated.saturating_add(*actions as u64);

                let entry = state
                    .per_kind
                    .entry(kind.annotation().to_string())
                    .or_default();
                *entry = entry.saturating_add(1);
            }
            CompileEvent::ServiceMerged { .. } => {
                state.merges = state.merges.saturating_add(1);
            }
        });
    }
}

const GLOBAL_COMPILE_SINK: GlobalCompileSink = GlobalCompileSink;

pub(crate) fn record(event: &CompileEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` came from a valid `&dyn CompileSink` in `with_compile_sink`,
        //   which restores the previous pointer on every exit path, including
        //   unwind, via its drop guard.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the shared
        //   borrow used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_COMPILE_SINK.record(event);
    }
}

/// Snapshot the current counter state.
#[must_use]
pub fn compile_report() -> CompileReport {
    STATE.with_borrow(Clone::clone)
}

/// Reset all counter state.
pub fn compile_reset_all() {
    STATE.with_borrow_mut(|state| *state = CompileReport::default());
}

/// Run a closure with a temporary sink override.
pub fn with_compile_sink<T>(sink: &dyn CompileSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn CompileSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The lifetime is erased to a raw pointer installed only for this
    //   dynamic scope; the guard restores the previous slot on all exits,
    //   including panic.
    // - `record` only dereferences synchronously and never persists the
    //   pointer.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn CompileSink, *const dyn CompileSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}
