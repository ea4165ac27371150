use crate::{
    access::compose,
    artifact::{
        Artifacts,
        action::{ActionDef, ActionKind},
        event::{EventDef, EventKind},
    },
    compile::{
        action_name, concat_properties, event_name, id_strategy, model_id_property, record_view,
    },
    context::CompilationContext,
    error::Error,
};
use relgen_schema::{
    node::{RelationAnnotation, ViewSpec},
    types::Operation,
};

/// Direct entity: plain CRUD on the model itself, no owner references, no
/// schema augmentation. Records carry their own opaque id.
pub fn compile(
    annotation: &RelationAnnotation,
    ctx: &CompilationContext,
) -> Result<Artifacts, Error> {
    let rules = annotation.access();
    let strategy = id_strategy(ctx);
    let mut artifacts = Artifacts::new();

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

    for kind in [EventKind::Created, EventKind::Updated, EventKind::Deleted] {
        artifacts.events.push(EventDef {
            name: event_name(ctx, kind),
            model: ctx.model_name.clone(),
            kind,
            id_strategy: strategy.clone(),
            defaults: ctx.defaults.clone(),
        });
    }

    for kind in [ActionKind::Create, ActionKind::Update, ActionKind::Delete] {
        let Some(access) = compose(&ctx.model_name, rules, kind.operation()) else {
            continue;
        };

        // Create accepts an optional caller-supplied id; update and delete
        // require it. Delete takes no data payload.
        let input = match kind {
            ActionKind::Create => concat_properties([
                [model_id_property(ctx, false)].into_iter().collect(),
                ctx.model_properties.clone(),
            ]),
            ActionKind::Update => concat_properties([
                [model_id_property(ctx, true)].into_iter().collect(),
                ctx.model_properties.clone(),
            ]),
            _ => [model_id_property(ctx, true)].into_iter().collect(),
        };

        artifacts.actions.push(ActionDef {
            name: action_name(ctx, kind.verb()),
            model: ctx.model_name.clone(),
            kind,
            event_name: event_name(ctx, kind.event_kind()),
            input,
            access: Some(access.clone()),
            queued_by: vec![ctx.model_property_name.clone()],
            wait_for_events: true,
            id_strategy: strategy.clone(),
            identifier_properties: Vec::new(),
            writable: ctx.writable_properties.clone(),
            defaults: ctx.defaults.clone(),
            fresh_id: kind == ActionKind::Create,
            model_property_name: ctx.model_property_name.clone(),
        });
        artifacts.access.push(access);
    }

    Ok(artifacts)
}
