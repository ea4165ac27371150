use crate::{
    artifact::Service, compile::compiler_for, context::CompilationContext, error::Error, obs,
};
use relgen_schema::{node::RelationKind, registry::ModelRegistry};

///
/// AnnotationScanner
///

/// Compile every model carrying an annotation of `kind`: mark it processed
/// (a repeat attempt is a configuration error), build the compilation
/// context, dispatch to the kind's compiler, apply the returned schema
/// changes to the registry, and merge the artifacts into the service.
pub fn process(
    registry: &mut ModelRegistry,
    kind: RelationKind,
    service: &mut Service,
) -> Result<(), Error> {
    let annotated: Vec<String> = registry
        .models()
        .filter(|model| model.has_relation(kind))
        .map(|model| model.name.clone())
        .collect();

    for name in annotated {
        registry.mark_processed(&name, kind)?;

        let (annotation, ctx) = {
            let model = registry
                .get(&name)
                .ok_or_else(|| Error::config(format!("unknown model: {name}")))?;
            let annotation = model
                .relation(kind)
                .cloned()
                .ok_or_else(|| Error::config(format!("model {name}: no {kind} annotation")))?;
            let ctx = CompilationContext::new(kind, model, annotation.others());

            (annotation, ctx)
        };

        let artifacts = compiler_for(kind)(&annotation, &ctx)?;
        let (views, events, actions) = (
            artifacts.views.len(),
            artifacts.events.len(),
            artifacts.actions.len(),
        );

        artifacts.schema.apply(registry)?;
        service.merge(artifacts)?;

        obs::sink::record(&obs::sink::CompileEvent::AnnotationCompiled {
            model: name,
            kind,
            views,
            events,
            actions,
        });
    }

    Ok(())
}

/// Compile every relation kind across the registry, in the fixed kind
/// order, and return the populated service.
pub fn process_all(registry: &mut ModelRegistry) -> Result<Service, Error> {
    let mut service = Service::new();
    for kind in RelationKind::ALL {
        process(registry, kind, &mut service)?;
    }

    Ok(service)
}
