use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// Error
///
/// Single failure taxonomy for compilation and generated artifacts. Every
/// action failure is raised before its event is emitted, so store state is
/// unchanged on any failing path.
///

#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid annotation configuration or duplicate processing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Payload failed schema/business-rule validation.
    #[error("validation failed: {0}")]
    Validation(ValidationIssues),

    /// Update/delete/reset target is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Create target already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Composed access predicate evaluated false.
    #[error("access denied: {0}")]
    AccessDenied(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists(key.into())
    }

    pub fn access_denied(what: impl Into<String>) -> Self {
        Self::AccessDenied(what.into())
    }

    /// Validation error for one missing required property.
    pub fn missing_property(name: impl Into<String>) -> Self {
        let mut issues = ValidationIssues::new();
        issues.add(name, "required", "property is missing");
        Self::Validation(issues)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationIssues> for Error {
    fn from(issues: ValidationIssues) -> Self {
        Self::Validation(issues)
    }
}

impl From<relgen_schema::registry::RegistryError> for Error {
    fn from(err: relgen_schema::registry::RegistryError) -> Self {
        Self::Config(err.to_string())
    }
}

///
/// FieldIssue
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub rule: String,
    pub message: String,
}

///
/// ValidationIssues
///
/// Per-field validation failures reported by the validation pipeline.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationIssues {
    issues: Vec<FieldIssue>,
}

impl ValidationIssues {
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.issues.push(FieldIssue {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter()
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} [{}]: {}", issue.field, issue.rule, issue.message)?;
            first = false;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_predicates() {
        assert!(Error::not_found("Post:1").is_not_found());
        assert!(Error::already_exists("Post:1").is_already_exists());
        assert!(Error::missing_property("title").is_validation());
        assert!(!Error::config("dup").is_not_found());
    }

    #[test]
    fn issues_render_with_rule() {
        let mut issues = ValidationIssues::new();
        issues.add("text", "nonEmpty", "must not be empty");

        assert_eq!(issues.to_string(), "text [nonEmpty]: must not be empty");
        assert!(issues.result().is_err());
    }
}
