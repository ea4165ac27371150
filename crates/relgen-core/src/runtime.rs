use crate::error::{Error, ValidationIssues};
use relgen_schema::{
    node::{PropertySet, ValidationRule},
    types::PropertyMap,
};
use serde_json::Value;
use std::cell::Cell;
use ulid::Ulid;

///
/// Database
///
/// Narrow storage port the generated artifacts run against. Appliers use
/// only the idempotent mutations (put/merge/remove/transfer); existence
/// preconditions in actions use `get`. Query planning, durability, and
/// transactions belong to the host engine behind this trait.
///

pub trait Database {
    /// Fetch a stored record by (model, id).
    fn get(&self, model: &str, id: &str) -> Option<PropertyMap>;

    /// Create-or-replace the record at (model, id).
    fn put(&mut self, model: &str, id: &str, record: PropertyMap);

    /// Merge fields into the record at (model, id); provided fields are
    /// replaced, omitted fields retain their stored values. Creates the
    /// record when absent so replays converge.
    fn merge(&mut self, model: &str, id: &str, fields: PropertyMap);

    /// Remove the record at (model, id). Absence is not an error.
    fn remove(&mut self, model: &str, id: &str);

    /// Re-key a record from `from` to `to` in one operation, merging the
    /// new ownership fields. A missing source with the target present is
    /// treated as already applied.
    fn transfer(
        &mut self,
        model: &str,
        from: &str,
        to: &str,
        fields: PropertyMap,
    ) -> Result<(), Error>;
}

///
/// ValidationPipeline
///
/// External validation capability: derive validators for a generated
/// action's input definitions and run them against a payload, reporting
/// field-level issues. Rule-library internals stay behind this trait.
///

pub trait ValidationPipeline {
    fn validate(
        &self,
        action: &str,
        input: &PropertySet,
        data: &PropertyMap,
    ) -> Result<(), ValidationIssues>;
}

///
/// RuleValidator
///
/// Default pipeline applying the declared property rules.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleValidator;

impl ValidationPipeline for RuleValidator {
    fn validate(
        &self,
        _action: &str,
        input: &PropertySet,
        data: &PropertyMap,
    ) -> Result<(), ValidationIssues> {
        let mut issues = ValidationIssues::new();

        for property in input {
            let value = data.get(&property.name);
            for rule in &property.def.validation {
                match rule {
                    ValidationRule::NonEmpty => {
                        // Only validate fields the action actually writes.
                        let Some(value) = value else { continue };
                        if is_empty(value) {
                            issues.add(&property.name, rule.name(), "must not be empty");
                        }
                    }
                    ValidationRule::MaxLength(max) => {
                        if let Some(Value::String(s)) = value
                            && s.chars().count() > *max
                        {
                            issues.add(
                                &property.name,
                                rule.name(),
                                format!("longer than {max} characters"),
                            );
                        }
                    }
                }
            }
        }

        issues.result()
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

///
/// UidSource
///

pub trait UidSource {
    /// Generate a fresh opaque unique id.
    fn generate(&self) -> String;
}

/// Ulid-backed uid source. Seeded with a millisecond timestamp at
/// construction; successive ids advance the random component so ids stay
/// unique and lexicographically ordered within a process.
#[derive(Debug)]
pub struct UlidSource {
    timestamp_ms: u64,
    counter: Cell<u128>,
}

impl UlidSource {
    #[must_use]
    pub const fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            counter: Cell::new(0),
        }
    }
}

impl UidSource for UlidSource {
    fn generate(&self) -> String {
        let n = self.counter.get().wrapping_add(1);
        self.counter.set(n);

        Ulid::from_parts(self.timestamp_ms, n).to_string()
    }
}

/// Deterministic uid source for tests: `prefix-1`, `prefix-2`, ...
#[derive(Debug)]
pub struct SequenceUids {
    prefix: String,
    counter: Cell<u64>,
}

impl SequenceUids {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
        }
    }
}

impl UidSource for SequenceUids {
    fn generate(&self) -> String {
        let n = self.counter.get() + 1;
        self.counter.set(n);

        format!("{}-{n}", self.prefix)
    }
}

///
/// Runtime
///
/// Bundle of host collaborators an action execution needs.
///

pub struct Runtime<'a> {
    pub validation: &'a dyn ValidationPipeline,
    pub uids: &'a dyn UidSource,
}

/// Derive the declared default values for a property set.
#[must_use]
pub fn generate_defaults(properties: &PropertySet) -> PropertyMap {
    let mut defaults = PropertyMap::new();
    for property in properties {
        if let Some(value) = &property.def.default {
            defaults.insert(property.name.clone(), value.clone());
        }
    }

    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_schema::node::{Property, PropertyDef, PropertyType};
    use serde_json::json;

    #[test]
    fn rule_validator_reports_empty_fields() {
        let input: PropertySet = [Property::new(
            "text",
            PropertyDef::new(PropertyType::Text).non_empty(),
        )]
        .into_iter()
        .collect();

        let mut data = PropertyMap::new();
        data.insert("text".into(), json!(""));

        let issues = RuleValidator
            .validate("setComment", &input, &data)
            .unwrap_err();
        assert_eq!(issues.fields(), vec!["text"]);

        data.insert("text".into(), json!("hello"));
        assert!(RuleValidator.validate("setComment", &input, &data).is_ok());
    }

    #[test]
    fn max_length_rule() {
        let mut def = PropertyDef::new(PropertyType::Text);
        def.validation.push(ValidationRule::MaxLength(3));
        let input: PropertySet = [Property::new("tag", def)].into_iter().collect();

        let mut data = PropertyMap::new();
        data.insert("tag".into(), json!("abcd"));
        assert!(RuleValidator.validate("a", &input, &data).is_err());
    }

    #[test]
    fn sequence_uids_are_deterministic() {
        let uids = SequenceUids::new("post");
        assert_eq!(uids.generate(), "post-1");
        assert_eq!(uids.generate(), "post-2");
    }

    #[test]
    fn ulid_source_yields_distinct_ids() {
        let uids = UlidSource::new(1_700_000_000_000);
        let a = uids.generate();
        let b = uids.generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
    }

    #[test]
    fn defaults_only_for_declared_values() {
        let properties: PropertySet = [
            Property::new(
                "text",
                PropertyDef::new(PropertyType::Text).with_default(json!("")),
            ),
            Property::new("pinned", PropertyDef::new(PropertyType::Bool)),
        ]
        .into_iter()
        .collect();

        let defaults = generate_defaults(&properties);
        assert_eq!(defaults.get("text"), Some(&json!("")));
        assert!(!defaults.contains_key("pinned"));
    }
}
