use crate::{MAX_MODEL_NAME_LEN, MAX_PROPERTY_NAME_LEN, error::ErrorTree, node::Model};

/// Naming rules: model names are non-empty, capped, and start upper-case;
/// property names are non-empty, capped, and start lower-case.
pub(super) fn validate_naming(model: &Model, errs: &mut ErrorTree) {
    if model.name.is_empty() {
        errs.add("<model>", "model name must not be empty");
        return;
    }
    if model.name.len() > MAX_MODEL_NAME_LEN {
        errs.add(&model.name, "model name exceeds maximum length");
    }
    if !model.name.starts_with(|c: char| c.is_ascii_uppercase()) {
        errs.add(&model.name, "model name must start with an upper-case letter");
    }

    for property in &model.properties {
        let path = format!("{}.{}", model.name, property.name);

        if property.name.is_empty() {
            errs.add(&model.name, "property name must not be empty");
        } else if property.name.len() > MAX_PROPERTY_NAME_LEN {
            errs.add(&path, "property name exceeds maximum length");
        } else if !property.name.starts_with(|c: char| c.is_ascii_lowercase()) {
            errs.add(&path, "property name must start with a lower-case letter");
        }
    }
}
