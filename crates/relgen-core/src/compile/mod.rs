pub mod entity;
pub mod plural;
pub mod singular;

use crate::{
    access::EffectiveAccess,
    artifact::{
        Artifacts,
        event::EventKind,
        view::{ViewDef, ViewTarget},
    },
    context::CompilationContext,
    error::Error,
    ident::IdStrategy,
};
use relgen_schema::node::{
    Property, PropertyDef, PropertySet, PropertyType, RelationAnnotation, RelationKind, ViewSpec,
};

///
/// Compiler dispatch
///

pub type CompilerFn = fn(&RelationAnnotation, &CompilationContext) -> Result<Artifacts, Error>;

/// The compiler for one relation kind.
#[must_use]
pub fn compiler_for(kind: RelationKind) -> CompilerFn {
    match kind {
        RelationKind::Entity => entity::compile,
        RelationKind::PropertyOf | RelationKind::BoundToAny => singular::compile,
        RelationKind::ItemOfAny | RelationKind::RelatedToAny => plural::compile,
    }
}

///
/// Naming grammar
///
/// Derived names are the interop contract; clients address generated
/// artifacts by these exact strings.
///

pub(crate) fn event_name(ctx: &CompilationContext, kind: EventKind) -> String {
    if ctx.kind == RelationKind::Entity {
        format!("{}{}", ctx.model_name, kind.suffix())
    } else {
        format!(
            "{}{}{}{}",
            ctx.joined_others_property_name,
            ctx.reverse_word,
            ctx.model_name,
            kind.suffix()
        )
    }
}

pub(crate) fn action_name(ctx: &CompilationContext, verb: &str) -> String {
    if ctx.kind == RelationKind::Entity {
        format!("{verb}{}", ctx.model_name)
    } else {
        format!(
            "{verb}{}{}{}",
            ctx.joined_others_class_name, ctx.reverse_word, ctx.model_name
        )
    }
}

pub(crate) fn view_name(ctx: &CompilationContext, spec: &ViewSpec) -> String {
    if let Some(name) = &spec.name {
        return name.clone();
    }

    let suffix = spec.suffix.as_deref().unwrap_or("");
    if ctx.kind == RelationKind::Entity {
        let prefix = spec.prefix.as_deref().unwrap_or("");

        return format!("{prefix}{}{suffix}", ctx.model_name);
    }

    // A prefix switches the stem from the property join to the class join.
    let stem = match &spec.prefix {
        Some(prefix) => format!("{prefix}{}", ctx.joined_others_class_name),
        None => ctx.joined_others_property_name.clone(),
    };

    format!("{stem}{}{}{suffix}", ctx.reverse_word, ctx.model_name)
}

///
/// Shared builders
///

/// The relation's storage-id strategy. Entity and plural records carry
/// their own id; singular records are keyed by their owner references.
pub(crate) fn id_strategy(ctx: &CompilationContext) -> IdStrategy {
    match ctx.kind {
        RelationKind::PropertyOf => IdStrategy::Composite(ctx.other_property_names.clone()),
        RelationKind::BoundToAny => IdStrategy::AnyComposite(ctx.other_property_names.clone()),
        RelationKind::Entity | RelationKind::ItemOfAny | RelationKind::RelatedToAny => {
            IdStrategy::ModelProperty(ctx.model_property_name.clone())
        }
    }
}

/// Typed input properties for the relation's identifier set.
pub(crate) fn identifier_input(ctx: &CompilationContext) -> PropertySet {
    if ctx.kind.is_any() {
        ctx.other_property_names
            .iter()
            .flat_map(|role| {
                [
                    Property::new(
                        format!("{role}Type"),
                        PropertyDef::new(PropertyType::Text).non_empty(),
                    ),
                    Property::new(role.clone(), PropertyDef::new(PropertyType::AnyRef).non_empty()),
                ]
            })
            .collect()
    } else {
        ctx.others
            .iter()
            .zip(&ctx.other_property_names)
            .map(|(other, name)| {
                Property::new(
                    name.clone(),
                    PropertyDef::new(PropertyType::Ref(other.clone())).non_empty(),
                )
            })
            .collect()
    }
}

/// The model's own id property as action/view input.
pub(crate) fn model_id_property(ctx: &CompilationContext, required: bool) -> Property {
    let def = PropertyDef::new(PropertyType::Ref(ctx.model_name.clone()));

    Property::new(
        ctx.model_property_name.clone(),
        if required { def.non_empty() } else { def },
    )
}

/// Concatenate property sets, first declaration of a name winning.
pub(crate) fn concat_properties(sets: impl IntoIterator<Item = PropertySet>) -> PropertySet {
    let mut out = PropertySet::new();
    for set in sets {
        for property in &set {
            if !out.contains(&property.name) {
                out.push(property.clone());
            }
        }
    }

    out
}

/// A record-targeted view for one `ViewSpec` layered over the base config.
pub(crate) fn record_view(
    ctx: &CompilationContext,
    spec: &ViewSpec,
    strategy: &IdStrategy,
    access: &EffectiveAccess,
) -> ViewDef {
    let input = if ctx.kind == RelationKind::Entity {
        [model_id_property(ctx, true)].into_iter().collect()
    } else {
        identifier_input(ctx)
    };

    ViewDef {
        name: view_name(ctx, spec),
        model: ctx.model_name.clone(),
        input,
        target: ViewTarget::Record(strategy.clone()),
        fields: spec.fields.clone(),
        access: Some(access.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_schema::node::Model;

    fn ctx(kind: RelationKind, model: &str, others: &[&str]) -> CompilationContext {
        CompilationContext::new(
            kind,
            &Model::new(model),
            others.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn entity_names_have_no_relation_words() {
        let ctx = ctx(RelationKind::Entity, "Post", &[]);

        assert_eq!(event_name(&ctx, EventKind::Created), "PostCreated");
        assert_eq!(action_name(&ctx, "update"), "updatePost");
        assert_eq!(view_name(&ctx, &ViewSpec::default()), "Post");
    }

    #[test]
    fn singular_names_follow_reverse_word_grammar() {
        let ctx = ctx(RelationKind::PropertyOf, "Comment", &["Post"]);

        assert_eq!(event_name(&ctx, EventKind::Set), "postOwnedCommentSet");
        assert_eq!(action_name(&ctx, "set"), "setPostOwnedComment");
        assert_eq!(view_name(&ctx, &ViewSpec::default()), "postOwnedComment");
    }

    #[test]
    fn bound_names_use_bound_word() {
        let ctx = ctx(RelationKind::BoundToAny, "Note", &["owner"]);

        assert_eq!(event_name(&ctx, EventKind::Updated), "ownerBoundNoteUpdated");
        assert_eq!(action_name(&ctx, "reset"), "resetOwnerBoundNote");
    }

    #[test]
    fn view_prefix_switches_to_class_join() {
        let ctx = ctx(RelationKind::PropertyOf, "Comment", &["Post"]);
        let spec = ViewSpec {
            prefix: Some("my".into()),
            suffix: Some("Brief".into()),
            ..ViewSpec::default()
        };

        assert_eq!(view_name(&ctx, &spec), "myPostOwnedCommentBrief");

        let named = ViewSpec {
            name: Some("custom".into()),
            ..ViewSpec::default()
        };
        assert_eq!(view_name(&ctx, &named), "custom");
    }

    #[test]
    fn any_identifier_input_declares_type_tags() {
        let ctx = ctx(RelationKind::ItemOfAny, "Item", &["owner"]);
        let input = identifier_input(&ctx);

        assert_eq!(input.names(), vec!["ownerType", "owner"]);
        assert_eq!(input.get("owner").unwrap().ty, PropertyType::AnyRef);
    }

    #[test]
    fn concat_keeps_first_declaration() {
        let a: PropertySet = [Property::new("x", PropertyDef::new(PropertyType::Text))]
            .into_iter()
            .collect();
        let b: PropertySet = [
            Property::new("x", PropertyDef::new(PropertyType::Int)),
            Property::new("y", PropertyDef::new(PropertyType::Bool)),
        ]
        .into_iter()
        .collect();

        let merged = concat_properties([a, b]);
        assert_eq!(merged.names(), vec!["x", "y"]);
        assert_eq!(merged.get("x").unwrap().ty, PropertyType::Text);
    }
}
