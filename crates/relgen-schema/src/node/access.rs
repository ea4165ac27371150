use crate::types::{Operation, PropertyMap};
use serde::Serialize;
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

///
/// AccessRequest
///
/// Inputs an access predicate may inspect: the caller's opaque claims and
/// the properties of the view/action invocation being gated.
///

pub struct AccessRequest<'a> {
    pub client: &'a PropertyMap,
    pub input: &'a PropertyMap,
}

///
/// AccessPredicate
///
/// Opaque boolean gate. The compiler only composes predicates; evaluating
/// them against live callers is the host runtime's job.
///

#[derive(Clone)]
pub struct AccessPredicate(Arc<dyn Fn(&AccessRequest<'_>) -> bool + Send + Sync>);

impl AccessPredicate {
    pub fn new(f: impl Fn(&AccessRequest<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Predicate that grants every request. Useful in tests and demos.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::new(|_| true)
    }

    /// Predicate granting requests whose client claim `key` equals `value`.
    pub fn client_claim(key: impl Into<String>, value: serde_json::Value) -> Self {
        let key = key.into();
        Self::new(move |req| req.client.get(&key) == Some(&value))
    }

    #[must_use]
    pub fn check(&self, req: &AccessRequest<'_>) -> bool {
        (self.0)(req)
    }
}

impl Debug for AccessPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessPredicate(..)")
    }
}

///
/// InheritedAccess
///
/// One link of an access-control chain: grants on the parent model, reached
/// through the owner-reference property `via`, also grant here.
///

#[derive(Clone, Debug, Serialize)]
pub struct InheritedAccess {
    /// Owner-reference property on this model holding the parent id.
    pub via: String,
    /// Parent model whose effective access is consulted.
    pub model: String,
}

impl InheritedAccess {
    pub fn new(via: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            via: via.into(),
            model: model.into(),
        }
    }
}

///
/// AccessRules
///
/// Declared access configuration for one relation annotation. A specific
/// per-operation predicate wins; `write` is the fallback for every mutating
/// operation. An operation with no predicate at all (and no inherited
/// chain) is not generated.
///

#[derive(Clone, Debug, Default)]
pub struct AccessRules {
    pub read: Option<AccessPredicate>,
    pub create: Option<AccessPredicate>,
    pub update: Option<AccessPredicate>,
    pub delete: Option<AccessPredicate>,
    pub set: Option<AccessPredicate>,
    pub reset: Option<AccessPredicate>,

    /// Fallback for mutating operations without a specific predicate.
    pub write: Option<AccessPredicate>,

    /// Access-control chain inherited from parent relations.
    pub inherit: Vec<InheritedAccess>,
}

impl AccessRules {
    /// Rules granting everything; test/demo convenience.
    #[must_use]
    pub fn open() -> Self {
        Self {
            read: Some(AccessPredicate::allow_all()),
            write: Some(AccessPredicate::allow_all()),
            ..Self::default()
        }
    }

    /// The specific predicate declared for an operation, if any.
    #[must_use]
    pub const fn direct(&self, op: Operation) -> Option<&AccessPredicate> {
        match op {
            Operation::Read => self.read.as_ref(),
            Operation::Create => self.create.as_ref(),
            Operation::Update => self.update.as_ref(),
            Operation::Delete => self.delete.as_ref(),
            Operation::Set => self.set.as_ref(),
            Operation::Reset => self.reset.as_ref(),
        }
    }

    /// The fallback predicate for an operation, if any.
    #[must_use]
    pub const fn fallback(&self, op: Operation) -> Option<&AccessPredicate> {
        if op.is_write() { self.write.as_ref() } else { None }
    }

    /// Whether any predicate (direct, fallback, or inherited) covers `op`.
    /// This is the generation gate: `false` means the operation's artifact
    /// is not produced at all.
    #[must_use]
    pub fn covers(&self, op: Operation) -> bool {
        self.direct(op).is_some() || self.fallback(op).is_some() || !self.inherit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_fallback_covers_mutations_only() {
        let rules = AccessRules {
            write: Some(AccessPredicate::allow_all()),
            ..AccessRules::default()
        };

        assert!(rules.covers(Operation::Create));
        assert!(rules.covers(Operation::Reset));
        assert!(!rules.covers(Operation::Read));
    }

    #[test]
    fn client_claim_predicate() {
        let pred = AccessPredicate::client_claim("role", json!("admin"));
        let mut client = PropertyMap::new();
        let input = PropertyMap::new();

        client.insert("role".into(), json!("admin"));
        assert!(pred.check(&AccessRequest {
            client: &client,
            input: &input
        }));

        client.insert("role".into(), json!("user"));
        assert!(!pred.check(&AccessRequest {
            client: &client,
            input: &input
        }));
    }

    #[test]
    fn inherited_chain_alone_covers() {
        let rules = AccessRules {
            inherit: vec![InheritedAccess::new("post", "Post")],
            ..AccessRules::default()
        };

        assert!(rules.covers(Operation::Update));
        assert!(rules.covers(Operation::Read));
    }
}
