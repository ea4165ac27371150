use crate::{
    access::compose,
    artifact::{
        Artifacts,
        action::{ActionDef, ActionKind},
        event::{EventDef, EventKind},
    },
    augment::{define_any_index, define_any_properties, define_index, define_properties},
    compile::{action_name, concat_properties, event_name, id_strategy, identifier_input, record_view},
    context::CompilationContext,
    error::Error,
};
use relgen_schema::{
    node::{RelationAnnotation, ViewSpec},
    types::Operation,
};

/// Singular relations (propertyOf, boundToAny): at most one instance per
/// owner, keyed by the composite owner identifier, mutated with
/// set/update/reset semantics. Reset takes identifier-only input.
pub fn compile(
    annotation: &RelationAnnotation,
    ctx: &CompilationContext,
) -> Result<Artifacts, Error> {
    let rules = annotation.access();
    let strategy = id_strategy(ctx);
    let identifier_properties = ctx.identifier_properties();
    let mut artifacts = Artifacts::new();

    if ctx.kind.is_any() {
        artifacts.schema.extend(define_any_properties(ctx));
        artifacts.schema.extend(define_any_index(ctx));
    } else {
        artifacts.schema.extend(define_properties(ctx));
        artifacts
            .schema
            .extend(define_index(ctx, identifier_properties.clone()));
    }

    if let Some(access) = compose(&ctx.model_name, rules, Operation::Read) {
        artifacts
            .views
            .push(record_view(ctx, &ViewSpec::default(), &strategy, &access));
        for spec in annotation.views() {
            artifacts
                .views
                .push(record_view(ctx, spec, &strategy, &access));
        }
        artifacts.access.push(access);
    }

    for kind in [
        EventKind::Set,
        EventKind::Updated,
        EventKind::Transferred,
        EventKind::Reset,
    ] {
        artifacts.events.push(EventDef {
            name: event_name(ctx, kind),
            model: ctx.model_name.clone(),
            kind,
            id_strategy: strategy.clone(),
            defaults: ctx.defaults.clone(),
        });
    }

    for kind in [ActionKind::Set, ActionKind::Update, ActionKind::Reset] {
        let Some(access) = compose(&ctx.model_name, rules, kind.operation()) else {
            continue;
        };

        let input = if kind == ActionKind::Reset {
            identifier_input(ctx)
        } else {
            concat_properties([identifier_input(ctx), ctx.model_properties.clone()])
        };

        artifacts.actions.push(ActionDef {
            name: action_name(ctx, kind.verb()),
            model: ctx.model_name.clone(),
            kind,
            event_name: event_name(ctx, kind.event_kind()),
            input,
            access: Some(access.clone()),
            queued_by: identifier_properties.clone(),
            wait_for_events: true,
            id_strategy: strategy.clone(),
            identifier_properties: identifier_properties.clone(),
            writable: ctx.writable_properties.clone(),
            defaults: ctx.defaults.clone(),
            fresh_id: false,
            model_property_name: ctx.model_property_name.clone(),
        });
        artifacts.access.push(access);
    }

    Ok(artifacts)
}
