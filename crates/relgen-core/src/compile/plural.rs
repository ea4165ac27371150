use crate::{
    access::{EffectiveAccess, compose},
    artifact::{
        Artifacts,
        action::{ActionDef, ActionKind},
        event::{EventDef, EventKind},
        view::{ViewDef, ViewTarget},
    },
    augment::{define_any_indexes, define_any_properties, define_sort_index},
    compile::{
        action_name, concat_properties, event_name, id_strategy, identifier_input,
        model_id_property, view_name,
    },
    context::{CompilationContext, pascal},
    error::Error,
};
use relgen_schema::{
    node::{RelationAnnotation, ViewSpec},
    types::Operation,
};

/// Plural relations (itemOfAny, relatedToAny): many instances per owner,
/// each carrying its own id, mutated with create/update/delete semantics.
/// The read view is a range over the owner's identifier key.
pub fn compile(
    annotation: &RelationAnnotation,
    ctx: &CompilationContext,
) -> Result<Artifacts, Error> {
    let rules = annotation.access();
    let strategy = id_strategy(ctx);
    let identifier_properties = ctx.identifier_properties();
    let sorts = annotation.sort_by();
    let mut artifacts = Artifacts::new();

    artifacts.schema.extend(define_any_properties(ctx));
    artifacts.schema.extend(define_any_indexes(ctx));
    for sort in sorts {
        artifacts.schema.extend(define_sort_index(ctx, sort));
    }

    if let Some(access) = compose(&ctx.model_name, rules, Operation::Read) {
        let base_name = view_name(ctx, &ViewSpec::default());
        let base_sort = sorts.first().cloned().unwrap_or_default();
        artifacts
            .views
            .push(range_view(ctx, base_name.clone(), base_sort, &access));

        // Further sort specs get their own suffixed views.
        for sort in sorts.iter().skip(1) {
            let suffix: String = sort.iter().map(|field| pascal(field)).collect();
            artifacts.views.push(range_view(
                ctx,
                format!("{base_name}By{suffix}"),
                sort.clone(),
                &access,
            ));
        }
        artifacts.access.push(access);
    }

    for kind in [
        EventKind::Created,
        EventKind::Updated,
        EventKind::Transferred,
        EventKind::Deleted,
    ] {
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

        let input = match kind {
            ActionKind::Create => concat_properties([
                identifier_input(ctx),
                [model_id_property(ctx, false)].into_iter().collect(),
                ctx.model_properties.clone(),
            ]),
            ActionKind::Update => concat_properties([
                [model_id_property(ctx, true)].into_iter().collect(),
                identifier_input(ctx),
                ctx.model_properties.clone(),
            ]),
            _ => concat_properties([
                [model_id_property(ctx, true)].into_iter().collect(),
                identifier_input(ctx),
            ]),
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
            fresh_id: kind == ActionKind::Create,
            model_property_name: ctx.model_property_name.clone(),
        });
        artifacts.access.push(access);
    }

    Ok(artifacts)
}

fn range_view(
    ctx: &CompilationContext,
    name: String,
    sort: Vec<String>,
    access: &EffectiveAccess,
) -> ViewDef {
    ViewDef {
        name,
        model: ctx.model_name.clone(),
        input: identifier_input(ctx),
        target: ViewTarget::Range {
            key_properties: ctx.identifier_properties(),
            sort,
        },
        fields: None,
        access: Some(access.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::IdStrategy;
    use relgen_schema::node::{
        AccessRules, ItemOfAnyConfig, Model, PropertyDef, PropertyType, RelatedToAnyConfig,
        RelationKind,
    };
    use serde_json::json;

    fn item_model() -> Model {
        Model::new("Item")
            .with_property("title", PropertyDef::new(PropertyType::Text).non_empty())
            .with_property(
                "createdAt",
                PropertyDef::new(PropertyType::Timestamp).with_default(json!(0)),
            )
    }

    #[test]
    fn item_of_any_generates_owner_range_artifacts() {
        let annotation = RelationAnnotation::ItemOfAny(ItemOfAnyConfig {
            to: Vec::new(),
            access: AccessRules::open(),
            sort_by: vec![vec!["createdAt".into()]],
        });
        let model = item_model();
        let ctx = CompilationContext::new(RelationKind::ItemOfAny, &model, annotation.others());

        let artifacts = compile(&annotation, &ctx).unwrap();

        let events: Vec<&str> = artifacts.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            events,
            vec![
                "ownerOwnedItemCreated",
                "ownerOwnedItemUpdated",
                "ownerOwnedItemTransferred",
                "ownerOwnedItemDeleted",
            ]
        );

        let actions: Vec<&str> = artifacts.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "createOwnerOwnedItem",
                "updateOwnerOwnedItem",
                "deleteOwnerOwnedItem",
            ]
        );

        // One sorted range view over the owner key.
        assert_eq!(artifacts.views.len(), 1);
        let view = &artifacts.views[0];
        assert_eq!(view.name, "ownerOwnedItem");
        match &view.target {
            ViewTarget::Range {
                key_properties,
                sort,
            } => {
                assert_eq!(key_properties, &vec!["ownerType", "owner"]);
                assert_eq!(sort, &vec!["createdAt"]);
            }
            ViewTarget::Record(_) => panic!("plural view should target a range"),
        }

        // Per-role index plus the sort index.
        let index_fields: Vec<&Vec<String>> = artifacts
            .schema
            .indexes
            .iter()
            .map(|(_, i)| &i.fields)
            .collect();
        assert_eq!(
            index_fields,
            vec![
                &vec!["ownerType".to_string(), "owner".to_string()],
                &vec![
                    "ownerType".to_string(),
                    "owner".to_string(),
                    "createdAt".to_string()
                ],
            ]
        );

        let create = &artifacts.actions[0];
        assert!(create.fresh_id);
        assert_eq!(
            create.id_strategy,
            IdStrategy::ModelProperty("item".into())
        );
        assert_eq!(create.queued_by, vec!["ownerType", "owner"]);
        assert_eq!(
            create.input.names(),
            vec!["ownerType", "owner", "item", "title", "createdAt"]
        );
    }

    #[test]
    fn related_to_any_uses_related_word() {
        let annotation = RelationAnnotation::RelatedToAny(RelatedToAnyConfig {
            to: Vec::new(),
            access: AccessRules::open(),
            sort_by: Vec::new(),
        });
        let model = Model::new("Task").with_property(
            "label",
            PropertyDef::new(PropertyType::Text).with_default(json!("")),
        );
        let ctx = CompilationContext::new(RelationKind::RelatedToAny, &model, annotation.others());

        let artifacts = compile(&annotation, &ctx).unwrap();

        assert_eq!(artifacts.events[0].name, "ownerRelatedTaskCreated");
        assert_eq!(artifacts.actions[0].name, "createOwnerRelatedTask");

        // No sort configured: the range view falls back to insertion order.
        match &artifacts.views[0].target {
            ViewTarget::Range { sort, .. } => assert!(sort.is_empty()),
            ViewTarget::Record(_) => panic!("plural view should target a range"),
        }
    }
}
