use crate::{
    context::{CompilationContext, pascal},
    error::Error,
};
use relgen_schema::{
    node::{IndexDef, Property, PropertyDef, PropertyType},
    registry::ModelRegistry,
};

///
/// SchemaChanges
///
/// Property and index additions a compiler wants applied to the registry.
/// Collected explicitly per compilation and applied by the caller, so
/// augmentation is visible in the compiler output instead of happening as
/// a side effect.
///

#[derive(Debug, Default)]
pub struct SchemaChanges {
    /// (model name, property) pairs, in derivation order.
    pub properties: Vec<(String, Property)>,
    /// (model name, index) pairs, in derivation order.
    pub indexes: Vec<(String, IndexDef)>,
}

impl SchemaChanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(&mut self, model: &str, property: Property) {
        self.properties.push((model.to_string(), property));
    }

    pub fn add_index(&mut self, model: &str, index: IndexDef) {
        self.indexes.push((model.to_string(), index));
    }

    pub fn extend(&mut self, other: Self) {
        self.properties.extend(other.properties);
        self.indexes.extend(other.indexes);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.indexes.is_empty()
    }

    /// Apply the changes to the registry. A property or index the schema
    /// author already declared under the same name is left untouched.
    pub fn apply(&self, registry: &mut ModelRegistry) -> Result<(), Error> {
        for (model_name, property) in &self.properties {
            let model = registry
                .get_mut(model_name)
                .ok_or_else(|| Error::config(format!("unknown model: {model_name}")))?;

            if !model.properties.contains(&property.name) {
                model.properties.push(property.clone());
            }
        }

        for (model_name, index) in &self.indexes {
            let model = registry
                .get_mut(model_name)
                .ok_or_else(|| Error::config(format!("unknown model: {model_name}")))?;

            if !model.indexes.iter().any(|i| i.name == index.name) {
                model.indexes.push(index.clone());
            }
        }

        Ok(())
    }
}

/// Derived index name over an ordered field list.
#[must_use]
pub fn index_name(fields: &[String]) -> String {
    let joined: String = fields.iter().map(|field| pascal(field)).collect();

    format!("by{joined}")
}

/// Owner-reference properties for a fixed relation: one typed reference
/// per related model, lower-camel named, required non-empty.
#[must_use]
pub fn define_properties(ctx: &CompilationContext) -> SchemaChanges {
    let mut changes = SchemaChanges::new();
    for (other, property_name) in ctx.others.iter().zip(&ctx.other_property_names) {
        changes.add_property(
            &ctx.model_name,
            Property::new(
                property_name.clone(),
                PropertyDef::new(PropertyType::Ref(other.clone())).non_empty(),
            ),
        );
    }

    changes
}

/// Owner-reference properties for an any relation: each role contributes a
/// type-tag property and an open-ended reference property.
#[must_use]
pub fn define_any_properties(ctx: &CompilationContext) -> SchemaChanges {
    let mut changes = SchemaChanges::new();
    for role in &ctx.other_property_names {
        changes.add_property(
            &ctx.model_name,
            Property::new(
                format!("{role}Type"),
                PropertyDef::new(PropertyType::Text).non_empty(),
            ),
        );
        changes.add_property(
            &ctx.model_name,
            Property::new(
                role.clone(),
                PropertyDef::new(PropertyType::AnyRef).non_empty(),
            ),
        );
    }

    changes
}

/// Index over an explicit ordered field list.
#[must_use]
pub fn define_index(ctx: &CompilationContext, fields: Vec<String>) -> SchemaChanges {
    let mut changes = SchemaChanges::new();
    changes.add_index(&ctx.model_name, IndexDef::new(index_name(&fields), fields));

    changes
}

/// Combined index over the full identifier property set.
#[must_use]
pub fn define_any_index(ctx: &CompilationContext) -> SchemaChanges {
    define_index(ctx, ctx.identifier_properties())
}

/// One index per any role, keyed by its type tag and reference.
#[must_use]
pub fn define_any_indexes(ctx: &CompilationContext) -> SchemaChanges {
    let mut changes = SchemaChanges::new();
    for role in &ctx.other_property_names {
        changes.extend(define_index(
            ctx,
            vec![format!("{role}Type"), role.clone()],
        ));
    }

    changes
}

/// Sorted-range index: the identifier property set followed by the sort
/// fields, so owner-scoped scans come back pre-ordered.
#[must_use]
pub fn define_sort_index(ctx: &CompilationContext, sort: &[String]) -> SchemaChanges {
    let mut fields = ctx.identifier_properties();
    fields.extend(sort.iter().cloned());

    define_index(ctx, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_schema::node::{Model, RelationKind};
    use serde_json::json;

    fn ctx(kind: RelationKind, others: &[&str]) -> CompilationContext {
        let model = Model::new("Comment").with_property(
            "text",
            PropertyDef::new(PropertyType::Text).with_default(json!("")),
        );

        CompilationContext::new(kind, &model, others.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn fixed_relation_adds_typed_references() {
        let changes = define_properties(&ctx(RelationKind::PropertyOf, &["Post"]));

        assert_eq!(changes.properties.len(), 1);
        let (model, property) = &changes.properties[0];
        assert_eq!(model, "Comment");
        assert_eq!(property.name, "post");
        assert_eq!(property.def.ty, PropertyType::Ref("Post".into()));
    }

    #[test]
    fn any_relation_adds_type_tag_pairs() {
        let changes = define_any_properties(&ctx(RelationKind::BoundToAny, &["owner"]));

        let names: Vec<&str> = changes
            .properties
            .iter()
            .map(|(_, p)| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["ownerType", "owner"]);
        assert_eq!(changes.properties[1].1.def.ty, PropertyType::AnyRef);
    }

    #[test]
    fn sort_index_appends_sort_fields_to_identifiers() {
        let context = ctx(RelationKind::ItemOfAny, &["owner"]);
        let changes = define_sort_index(&context, &["createdAt".to_string()]);

        let (_, index) = &changes.indexes[0];
        assert_eq!(index.name, "byOwnerTypeOwnerCreatedAt");
        assert_eq!(index.fields, vec!["ownerType", "owner", "createdAt"]);
    }

    #[test]
    fn apply_skips_declared_names() {
        let mut registry = ModelRegistry::new();
        registry
            .insert(Model::new("Comment").with_property(
                "post",
                PropertyDef::new(PropertyType::Text).with_default(json!("declared")),
            ))
            .unwrap();

        let context = ctx(RelationKind::PropertyOf, &["Post"]);
        define_properties(&context).apply(&mut registry).unwrap();

        let model = registry.get("Comment").unwrap();
        assert_eq!(
            model.properties.get("post").unwrap().ty,
            PropertyType::Text
        );
        assert_eq!(model.properties.len(), 1);
    }

    #[test]
    fn apply_to_unknown_model_fails() {
        let mut registry = ModelRegistry::new();
        let context = ctx(RelationKind::PropertyOf, &["Post"]);

        let err = define_properties(&context)
            .apply(&mut registry)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
