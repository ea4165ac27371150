use relgen_core::prelude::*;
use serde_json::{Value, json};

fn bag(entries: &[(&str, Value)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .insert(
            Model::new("Post")
                .with_property("title", PropertyDef::new(PropertyType::Text).non_empty())
                .with_property(
                    "body",
                    PropertyDef::new(PropertyType::Text).with_default(json!("")),
                )
                .with_relation(RelationAnnotation::Entity(EntityConfig {
                    access: AccessRules::open(),
                    views: Vec::new(),
                })),
        )
        .unwrap();

    registry
}

fn run(
    service: &Service,
    db: &mut MemoryDb,
    rt: &Runtime<'_>,
    action: &str,
    input: PropertyMap,
) -> Result<Event, Error> {
    let action = service
        .action(action)
        .ok_or_else(|| Error::config(format!("no action {action}")))?;
    let event = action.execute(db, rt, &input)?;
    let applier = service
        .event(&event.name)
        .ok_or_else(|| Error::config(format!("no event {}", event.name)))?;
    applier.apply(db, &event.payload)?;

    Ok(event)
}

fn read(service: &Service, db: &MemoryDb, view: &str, input: &PropertyMap) -> Option<Value> {
    let view = service.view(view)?;

    db.fetch(&view.dao_path(input).ok()?)
}

#[test]
fn create_read_round_trip_merges_defaults() {
    let mut registry = registry();
    let service = process_all(&mut registry).unwrap();
    let mut db = MemoryDb::new();
    let uids = SequenceUids::new("post");
    let rt = Runtime {
        validation: &RuleValidator,
        uids: &uids,
    };

    let event = run(
        &service,
        &mut db,
        &rt,
        "createPost",
        bag(&[("title", json!("Hello"))]),
    )
    .unwrap();
    assert_eq!(event.name, "PostCreated");
    let id = event.payload.id.clone().unwrap();
    assert_eq!(id, "post-1");

    let record = read(&service, &db, "Post", &bag(&[("post", json!(id.clone()))])).unwrap();
    assert_eq!(record["title"], json!("Hello"));
    // Omitted field filled from the schema default.
    assert_eq!(record["body"], json!(""));
    assert_eq!(record["id"], json!(id));
}

#[test]
fn create_of_existing_id_fails_already_exists() {
    let mut registry = registry();
    let service = process_all(&mut registry).unwrap();
    let mut db = MemoryDb::new();
    let uids = SequenceUids::new("post");
    let rt = Runtime {
        validation: &RuleValidator,
        uids: &uids,
    };

    run(
        &service,
        &mut db,
        &rt,
        "createPost",
        bag(&[("post", json!("p1")), ("title", json!("a"))]),
    )
    .unwrap();

    let err = run(
        &service,
        &mut db,
        &rt,
        "createPost",
        bag(&[("post", json!("p1")), ("title", json!("b"))]),
    )
    .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(db.get("Post", "p1").unwrap()["title"], json!("a"));
}

#[test]
fn update_of_absent_id_fails_and_leaves_store() {
    let mut registry = registry();
    let service = process_all(&mut registry).unwrap();
    let mut db = MemoryDb::new();
    let uids = SequenceUids::new("post");
    let rt = Runtime {
        validation: &RuleValidator,
        uids: &uids,
    };

    let err = run(
        &service,
        &mut db,
        &rt,
        "updatePost",
        bag(&[("post", json!("ghost")), ("title", json!("x"))]),
    )
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(db.is_empty("Post"));
}

#[test]
fn partial_update_retains_omitted_fields() {
    let mut registry = registry();
    let service = process_all(&mut registry).unwrap();
    let mut db = MemoryDb::new();
    let uids = SequenceUids::new("post");
    let rt = Runtime {
        validation: &RuleValidator,
        uids: &uids,
    };

    run(
        &service,
        &mut db,
        &rt,
        "createPost",
        bag(&[
            ("post", json!("p1")),
            ("title", json!("keep")),
            ("body", json!("old")),
        ]),
    )
    .unwrap();

    let event = run(
        &service,
        &mut db,
        &rt,
        "updatePost",
        bag(&[("post", json!("p1")), ("body", json!("new"))]),
    )
    .unwrap();
    assert_eq!(event.name, "PostUpdated");

    let record = db.get("Post", "p1").unwrap();
    assert_eq!(record["title"], json!("keep"));
    assert_eq!(record["body"], json!("new"));
}

#[test]
fn delete_then_read_misses() {
    let mut registry = registry();
    let service = process_all(&mut registry).unwrap();
    let mut db = MemoryDb::new();
    let uids = SequenceUids::new("post");
    let rt = Runtime {
        validation: &RuleValidator,
        uids: &uids,
    };

    run(
        &service,
        &mut db,
        &rt,
        "createPost",
        bag(&[("post", json!("p1")), ("title", json!("a"))]),
    )
    .unwrap();

    let event = run(
        &service,
        &mut db,
        &rt,
        "deletePost",
        bag(&[("post", json!("p1"))]),
    )
    .unwrap();
    assert_eq!(event.name, "PostDeleted");
    assert!(read(&service, &db, "Post", &bag(&[("post", json!("p1"))])).is_none());

    let err = run(
        &service,
        &mut db,
        &rt,
        "deletePost",
        bag(&[("post", json!("p1"))]),
    )
    .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn reprocessing_the_annotation_is_a_config_error() {
    let mut registry = registry();
    let mut service = Service::new();

    relgen_core::scanner::process(&mut registry, RelationKind::Entity, &mut service).unwrap();
    let counts = service.counts();

    let err = relgen_core::scanner::process(&mut registry, RelationKind::Entity, &mut service)
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(service.counts(), counts);
}
