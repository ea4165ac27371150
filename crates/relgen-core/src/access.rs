use crate::{artifact::Service, context::lower_camel};
use relgen_schema::{
    node::{AccessPredicate, AccessRequest, AccessRules, InheritedAccess},
    types::{Operation, PropertyMap},
};

/// Upper bound on access-control-chain recursion; cyclic parent chains
/// terminate as denied instead of looping.
const MAX_CHAIN_DEPTH: usize = 8;

///
/// EffectiveAccess
///
/// Composed access for one (model, operation): the logical OR of the
/// directly declared predicate, the generic read/write fallback, and each
/// inherited parent relation's own effective access. Composition happens
/// at compile time; evaluation is invoked by the host runtime per call.
///

#[derive(Clone, Debug)]
pub struct EffectiveAccess {
    pub model: String,
    pub op: Operation,
    direct: Vec<AccessPredicate>,
    inherited: Vec<InheritedAccess>,
}

impl EffectiveAccess {
    /// Evaluate against a request. `record` is the stored record of the
    /// gated entity when the host has one (update/delete paths); parent
    /// references are resolved from the input first, then the record.
    #[must_use]
    pub fn evaluate(
        &self,
        req: &AccessRequest<'_>,
        record: Option<&PropertyMap>,
        service: &Service,
    ) -> bool {
        self.evaluate_at(req, record, service, 0)
    }

    fn evaluate_at(
        &self,
        req: &AccessRequest<'_>,
        record: Option<&PropertyMap>,
        service: &Service,
        depth: usize,
    ) -> bool {
        if depth > MAX_CHAIN_DEPTH {
            return false;
        }

        if self.direct.iter().any(|p| p.check(req)) {
            return true;
        }

        for link in &self.inherited {
            let parent_id = req
                .input
                .get(&link.via)
                .or_else(|| record.and_then(|r| r.get(&link.via)));
            let Some(parent_id) = parent_id else { continue };

            let mut parent_input = PropertyMap::new();
            parent_input.insert(lower_camel(&link.model), parent_id.clone());
            let parent_req = AccessRequest {
                client: req.client,
                input: &parent_input,
            };

            let granted = service
                .access_for(&link.model, self.op)
                .iter()
                .any(|parent| parent.evaluate_at(&parent_req, None, service, depth + 1));
            if granted {
                return true;
            }
        }

        false
    }
}

///
/// AccessControlComposer
///

/// Compose the effective access for one operation of a relation. `None`
/// means no predicate covers the operation at all, which gates generation
/// of that operation's view/action entirely.
#[must_use]
pub fn compose(model: &str, rules: &AccessRules, op: Operation) -> Option<EffectiveAccess> {
    if !rules.covers(op) {
        return None;
    }

    let direct = rules
        .direct(op)
        .or_else(|| rules.fallback(op))
        .cloned()
        .into_iter()
        .collect();

    Some(EffectiveAccess {
        model: model.to_string(),
        op,
        direct,
        inherited: rules.inherit.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request<'a>(client: &'a PropertyMap, input: &'a PropertyMap) -> AccessRequest<'a> {
        AccessRequest { client, input }
    }

    #[test]
    fn specific_predicate_wins_over_fallback() {
        let rules = AccessRules {
            update: Some(AccessPredicate::client_claim("role", json!("editor"))),
            write: Some(AccessPredicate::allow_all()),
            ..AccessRules::default()
        };

        let access = compose("Comment", &rules, Operation::Update).unwrap();
        let service = Service::new();
        let input = PropertyMap::new();

        let mut client = PropertyMap::new();
        client.insert("role".into(), json!("viewer"));
        assert!(!access.evaluate(&request(&client, &input), None, &service));

        client.insert("role".into(), json!("editor"));
        assert!(access.evaluate(&request(&client, &input), None, &service));
    }

    #[test]
    fn write_fallback_applies_when_specific_absent() {
        let rules = AccessRules {
            write: Some(AccessPredicate::client_claim("role", json!("writer"))),
            ..AccessRules::default()
        };

        let access = compose("Comment", &rules, Operation::Delete).unwrap();
        let service = Service::new();
        let input = PropertyMap::new();

        let mut client = PropertyMap::new();
        client.insert("role".into(), json!("writer"));
        assert!(access.evaluate(&request(&client, &input), None, &service));
    }

    #[test]
    fn uncovered_operation_is_not_generated() {
        let rules = AccessRules::default();
        assert!(compose("Comment", &rules, Operation::Read).is_none());
        assert!(compose("Comment", &rules, Operation::Create).is_none());
    }

    #[test]
    fn inherited_chain_resolves_through_parent() {
        // Parent Post grants update to its author claim; child Comment has
        // no direct predicate, only the chain through its `post` reference.
        let parent_rules = AccessRules {
            write: Some(AccessPredicate::new(|req| {
                req.client.get("user") == Some(&json!("alice"))
            })),
            ..AccessRules::default()
        };
        let child_rules = AccessRules {
            inherit: vec![InheritedAccess::new("post", "Post")],
            ..AccessRules::default()
        };

        let mut service = Service::new();
        service.register_access(compose("Post", &parent_rules, Operation::Update).unwrap());

        let access = compose("Comment", &child_rules, Operation::Update).unwrap();

        let mut client = PropertyMap::new();
        client.insert("user".into(), json!("alice"));
        let mut input = PropertyMap::new();
        input.insert("post".into(), json!("p1"));

        assert!(access.evaluate(&request(&client, &input), None, &service));

        client.insert("user".into(), json!("bob"));
        assert!(!access.evaluate(&request(&client, &input), None, &service));

        // Parent reference may also come from the stored record.
        let empty = PropertyMap::new();
        client.insert("user".into(), json!("alice"));
        let mut record = PropertyMap::new();
        record.insert("post".into(), json!("p1"));
        assert!(access.evaluate(&request(&client, &empty), Some(&record), &service));
    }
}
