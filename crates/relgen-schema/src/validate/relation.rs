use crate::{
    MAX_INDEX_FIELDS,
    error::ErrorTree,
    node::{Model, RelationAnnotation, RelationKind},
    registry::ModelRegistry,
};
use std::collections::BTreeSet;

/// Relation checks: fixed targets must exist in the registry, at most one
/// annotation per kind per model, sort/index fields must be declared, and
/// index field counts stay within bounds.
pub(super) fn validate_relations(registry: &ModelRegistry, model: &Model, errs: &mut ErrorTree) {
    let mut seen = BTreeSet::<RelationKind>::new();

    for relation in &model.relations {
        let kind = relation.kind();
        let path = format!("{}.{}", model.name, kind.annotation());

        if !seen.insert(kind) {
            errs.add(&path, "annotation declared more than once");
            continue;
        }

        if kind == RelationKind::PropertyOf {
            validate_fixed_targets(registry, relation, &path, errs);
        }

        if kind.is_any() && relation.others().is_empty() {
            errs.add(&path, "any relation needs at least one role");
        }

        for sort_fields in relation.sort_by() {
            if sort_fields.is_empty() {
                errs.add(&path, "sort specification must name at least one field");
            }
            for field in sort_fields {
                if !model.properties.contains(field) {
                    errs.add(&path, format!("unknown sort field: {field}"));
                }
            }
        }
    }

    for index in &model.indexes {
        let path = format!("{}.{}", model.name, index.name);

        if index.fields.len() > MAX_INDEX_FIELDS {
            errs.add(&path, "index exceeds maximum field count");
        }
        for field in &index.fields {
            if !model.properties.contains(field) {
                errs.add(&path, format!("unknown index field: {field}"));
            }
        }
    }
}

fn validate_fixed_targets(
    registry: &ModelRegistry,
    relation: &RelationAnnotation,
    path: &str,
    errs: &mut ErrorTree,
) {
    let others = relation.others();

    if others.is_empty() {
        errs.add(path, "propertyOf needs at least one related model");
    }
    for other in &others {
        if !registry.contains(other) {
            errs.add(path, format!("unknown related model: {other}"));
        }
    }
}
