mod naming;
mod relation;

use crate::{error::ErrorTree, registry::ModelRegistry};

/// Validate every model in the registry, collecting all issues.
pub fn validate_registry(registry: &ModelRegistry) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    for model in registry.models() {
        naming::validate_naming(model, &mut errs);
        relation::validate_relations(registry, model, &mut errs);
    }

    errs.result()
}
