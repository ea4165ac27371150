use crate::node::{IndexDef, Property, PropertyDef, PropertySet, RelationAnnotation, RelationKind};

///
/// Model
///
/// A named entity type: ordered typed properties, secondary indexes, and
/// zero or more relation annotations. Models are declared by the schema
/// author; the compiler augments them with owner-reference properties and
/// derived indexes.
///

#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub properties: PropertySet,
    pub indexes: Vec<IndexDef>,
    pub relations: Vec<RelationAnnotation>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertySet::new(),
            indexes: Vec::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.push(Property::new(name, def));
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: RelationAnnotation) -> Self {
        self.relations.push(relation);
        self
    }

    /// The annotation of the given kind, if declared.
    #[must_use]
    pub fn relation(&self, kind: RelationKind) -> Option<&RelationAnnotation> {
        self.relations.iter().find(|r| r.kind() == kind)
    }

    #[must_use]
    pub fn has_relation(&self, kind: RelationKind) -> bool {
        self.relation(kind).is_some()
    }
}
