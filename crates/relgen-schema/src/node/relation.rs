use crate::node::AccessRules;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// RelationKind
///
/// Closed set of relation annotations. Each kind fixes the relation word /
/// reverse relation word pair used by the naming grammar.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum RelationKind {
    Entity,
    PropertyOf,
    ItemOfAny,
    BoundToAny,
    RelatedToAny,
}

impl RelationKind {
    pub const ALL: [Self; 5] = [
        Self::Entity,
        Self::PropertyOf,
        Self::ItemOfAny,
        Self::BoundToAny,
        Self::RelatedToAny,
    ];

    /// Annotation key as it appears on schema declarations.
    #[must_use]
    pub const fn annotation(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::PropertyOf => "propertyOf",
            Self::ItemOfAny => "itemOfAny",
            Self::BoundToAny => "boundToAny",
            Self::RelatedToAny => "relatedToAny",
        }
    }

    #[must_use]
    pub const fn relation_word(self) -> &'static str {
        match self {
            Self::Entity => "",
            Self::PropertyOf => "Property",
            Self::ItemOfAny => "Item",
            Self::BoundToAny | Self::RelatedToAny => "Friend",
        }
    }

    #[must_use]
    pub const fn reverse_word(self) -> &'static str {
        match self {
            Self::Entity => "",
            Self::PropertyOf | Self::ItemOfAny => "Owned",
            Self::BoundToAny => "Bound",
            Self::RelatedToAny => "Related",
        }
    }

    /// Open-ended target type (no fixed related-model list).
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::ItemOfAny | Self::BoundToAny | Self::RelatedToAny)
    }

    /// Singular relations hold at most one instance per owner and use
    /// set/update/reset semantics; plural ones use create/update/delete.
    #[must_use]
    pub const fn is_singular(self) -> bool {
        matches!(self, Self::PropertyOf | Self::BoundToAny)
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation())
    }
}

///
/// ViewSpec
///
/// One entry of a bulk `views` declaration: naming overrides and an
/// optional field projection layered over the relation's base view config.
///

#[derive(Clone, Debug, Default)]
pub struct ViewSpec {
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub fields: Option<Vec<String>>,
}

///
/// Per-kind configurations
///

/// Direct entity: plain CRUD on the model itself.
#[derive(Clone, Debug, Default)]
pub struct EntityConfig {
    pub access: AccessRules,
    pub views: Vec<ViewSpec>,
}

/// Singular owned property of one or more fixed models.
#[derive(Clone, Debug, Default)]
pub struct PropertyOfConfig {
    /// Related model names, in declaration order.
    pub to: Vec<String>,
    pub access: AccessRules,
    pub views: Vec<ViewSpec>,
}

/// Plural item owned by an open-ended ("any") owner.
#[derive(Clone, Debug, Default)]
pub struct ItemOfAnyConfig {
    /// Owner role names; defaults to a single `owner` role.
    pub to: Vec<String>,
    pub access: AccessRules,
    pub sort_by: Vec<Vec<String>>,
}

/// Singular bond to an open-ended target.
#[derive(Clone, Debug, Default)]
pub struct BoundToAnyConfig {
    pub to: Vec<String>,
    pub access: AccessRules,
    pub views: Vec<ViewSpec>,
}

/// Plural association with an open-ended target.
#[derive(Clone, Debug, Default)]
pub struct RelatedToAnyConfig {
    pub to: Vec<String>,
    pub access: AccessRules,
    pub sort_by: Vec<Vec<String>>,
}

///
/// RelationAnnotation
///

#[derive(Clone, Debug)]
pub enum RelationAnnotation {
    Entity(EntityConfig),
    PropertyOf(PropertyOfConfig),
    ItemOfAny(ItemOfAnyConfig),
    BoundToAny(BoundToAnyConfig),
    RelatedToAny(RelatedToAnyConfig),
}

impl RelationAnnotation {
    #[must_use]
    pub const fn kind(&self) -> RelationKind {
        match self {
            Self::Entity(_) => RelationKind::Entity,
            Self::PropertyOf(_) => RelationKind::PropertyOf,
            Self::ItemOfAny(_) => RelationKind::ItemOfAny,
            Self::BoundToAny(_) => RelationKind::BoundToAny,
            Self::RelatedToAny(_) => RelationKind::RelatedToAny,
        }
    }

    #[must_use]
    pub const fn access(&self) -> &AccessRules {
        match self {
            Self::Entity(c) => &c.access,
            Self::PropertyOf(c) => &c.access,
            Self::ItemOfAny(c) => &c.access,
            Self::BoundToAny(c) => &c.access,
            Self::RelatedToAny(c) => &c.access,
        }
    }

    /// Related model names (fixed kinds) or owner role names (any kinds).
    /// Any kinds with no declared roles default to a single `owner` role.
    #[must_use]
    pub fn others(&self) -> Vec<String> {
        let declared = match self {
            Self::Entity(_) => &[] as &[String],
            Self::PropertyOf(c) => &c.to,
            Self::ItemOfAny(c) => &c.to,
            Self::BoundToAny(c) => &c.to,
            Self::RelatedToAny(c) => &c.to,
        };

        if declared.is_empty() && self.kind().is_any() {
            return vec!["owner".to_string()];
        }

        declared.to_vec()
    }

    /// Sort specifications, where the kind supports them.
    #[must_use]
    pub fn sort_by(&self) -> &[Vec<String>] {
        match self {
            Self::ItemOfAny(c) => &c.sort_by,
            Self::RelatedToAny(c) => &c.sort_by,
            _ => &[],
        }
    }

    /// Bulk view declarations, where the kind supports them.
    #[must_use]
    pub fn views(&self) -> &[ViewSpec] {
        match self {
            Self::Entity(c) => &c.views,
            Self::PropertyOf(c) => &c.views,
            Self::BoundToAny(c) => &c.views,
            _ => &[],
        }
    }
}
