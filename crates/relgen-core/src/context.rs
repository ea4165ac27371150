use crate::runtime::generate_defaults;
use convert_case::{Case, Casing};
use relgen_schema::prelude::*;

/// Lower-camel form of a model or class name.
#[must_use]
pub fn lower_camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// Pascal form, used for class-name joins in the naming grammar.
#[must_use]
pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

///
/// CompilationContext
///
/// Transient per-(model, annotation) record shared by every generator.
/// Captured once at scan time; in particular the writable-property list is
/// snapshotted before augmentation so owner references never become
/// writable payload fields.
///

#[derive(Clone, Debug)]
pub struct CompilationContext {
    pub kind: RelationKind,
    pub model_name: String,
    /// Lower-camel model name; doubles as the id input property.
    pub model_property_name: String,
    /// Related model names (fixed kinds) or owner role names (any kinds),
    /// in declaration order.
    pub others: Vec<String>,
    /// Lower-camel reference property names, one per entry of `others`.
    pub other_property_names: Vec<String>,
    pub joined_others_property_name: String,
    pub joined_others_class_name: String,
    pub relation_word: &'static str,
    pub reverse_word: &'static str,
    /// Declared (pre-augmentation) property names; the writable subset of
    /// action input.
    pub writable_properties: Vec<String>,
    /// Declared property snapshot, used for action inputs and validators.
    pub model_properties: PropertySet,
    /// Declared default values derived from the property set.
    pub defaults: PropertyMap,
}

impl CompilationContext {
    #[must_use]
    pub fn new(kind: RelationKind, model: &Model, others: Vec<String>) -> Self {
        let other_property_names: Vec<String> =
            others.iter().map(|other| lower_camel(other)).collect();
        let joined_others_class_name: String =
            others.iter().map(|other| pascal(other)).collect();
        let joined_others_property_name = lower_camel(&joined_others_class_name);

        Self {
            kind,
            model_name: model.name.clone(),
            model_property_name: lower_camel(&model.name),
            others,
            other_property_names,
            joined_others_property_name,
            joined_others_class_name,
            relation_word: kind.relation_word(),
            reverse_word: kind.reverse_word(),
            writable_properties: model.properties.names(),
            model_properties: model.properties.clone(),
            defaults: generate_defaults(&model.properties),
        }
    }

    /// The relation's identifier property set, in declaration order. For
    /// any kinds each role contributes its type-tag property and its id
    /// property; this exact list is also the concurrency key.
    #[must_use]
    pub fn identifier_properties(&self) -> Vec<String> {
        if self.kind.is_any() {
            self.other_property_names
                .iter()
                .flat_map(|role| [format!("{role}Type"), role.clone()])
                .collect()
        } else {
            self.other_property_names.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_schema::node::{PropertyDef, PropertyType};
    use serde_json::json;

    fn comment_model() -> Model {
        Model::new("Comment")
            .with_property(
                "text",
                PropertyDef::new(PropertyType::Text).with_default(json!("")),
            )
            .with_property("pinned", PropertyDef::new(PropertyType::Bool))
    }

    #[test]
    fn joins_follow_declaration_order() {
        let ctx = CompilationContext::new(
            RelationKind::PropertyOf,
            &comment_model(),
            vec!["Post".into(), "Author".into()],
        );

        assert_eq!(ctx.model_property_name, "comment");
        assert_eq!(ctx.other_property_names, vec!["post", "author"]);
        assert_eq!(ctx.joined_others_class_name, "PostAuthor");
        assert_eq!(ctx.joined_others_property_name, "postAuthor");
        assert_eq!(ctx.identifier_properties(), vec!["post", "author"]);
        assert_eq!(ctx.defaults.get("text"), Some(&json!("")));
    }

    #[test]
    fn any_identifiers_carry_type_tags() {
        let ctx = CompilationContext::new(
            RelationKind::ItemOfAny,
            &comment_model(),
            vec!["owner".into()],
        );

        assert_eq!(ctx.identifier_properties(), vec!["ownerType", "owner"]);
        assert_eq!(ctx.reverse_word, "Owned");
    }
}
