//! Cross-reference between action-subject objects and the reference class.
//!
//! An action-subject object is a *candidate* when it belongs to the unit's
//! action class and its `oDn` contains the refcont prefix. Each candidate is
//! tested against the unit's reference set with the configured
//! [`JoinRule`]:
//!
//! - [`JoinRule::Literal`]: found when the reference set holds any object
//!   with `oCl == reference_class` and the candidate's own `oDn` starts with
//!   the prefix. The reference object's `dn` is never consulted.
//! - [`JoinRule::DnLookup`]: found when a reference object's `dn` equals the
//!   candidate's `oDn`. Reference dns are indexed once per unit.

use apic_core::{FxHashSet, JoinRule, ManagedObject, fx_hash_set};

/// Tests action objects against one unit's reference set.
#[derive(Debug)]
pub struct ReferenceMatcher<'r> {
    prefix: &'r str,
    lookup: Lookup<'r>,
}

#[derive(Debug)]
enum Lookup<'r> {
    Literal { any_reference: bool },
    Dn(FxHashSet<&'r str>),
}

impl<'r> ReferenceMatcher<'r> {
    /// Prepares a matcher over `references`.
    #[must_use]
    pub fn new(
        rule: JoinRule,
        references: &'r [ManagedObject],
        reference_class: &str,
        prefix: &'r str,
    ) -> Self {
        let lookup = match rule {
            JoinRule::DnLookup => {
                let mut dns = fx_hash_set();
                dns.extend(references.iter().filter_map(ManagedObject::dn));
                Lookup::Dn(dns)
            }
            _ => Lookup::Literal {
                any_reference: references
                    .iter()
                    .any(|r| r.o_cl() == Some(reference_class)),
            },
        };
        Self { prefix, lookup }
    }

    /// Returns `true` if `action` carries a refcont `oDn` of `action_class`.
    #[must_use]
    pub fn is_candidate(&self, action: &ManagedObject, action_class: &str) -> bool {
        action.is_class(action_class) && action.o_dn().is_some_and(|dn| dn.contains(self.prefix))
    }

    /// Returns `true` if a reference for `action` was found.
    #[must_use]
    pub fn is_referenced(&self, action: &ManagedObject) -> bool {
        let Some(o_dn) = action.o_dn() else {
            return false;
        };
        match &self.lookup {
            Lookup::Literal { any_reference } => *any_reference && o_dn.starts_with(self.prefix),
            Lookup::Dn(dns) => dns.contains(o_dn),
        }
    }
}

/// Result of cross-checking one unit's action objects.
#[derive(Debug, Default)]
pub struct JoinOutcome<'a> {
    /// Number of candidates tested.
    pub checked: usize,
    /// Candidates without a reference, in input order.
    pub unreferenced: Vec<&'a ManagedObject>,
}

/// Cross-checks `actions` against `references`.
#[must_use]
pub fn cross_reference<'a>(
    actions: &'a [ManagedObject],
    references: &[ManagedObject],
    action_class: &str,
    reference_class: &str,
    prefix: &str,
    rule: JoinRule,
) -> JoinOutcome<'a> {
    let matcher = ReferenceMatcher::new(rule, references, reference_class, prefix);
    let mut outcome = JoinOutcome::default();
    for action in actions.iter().filter(|a| matcher.is_candidate(a, action_class)) {
        outcome.checked += 1;
        if !matcher.is_referenced(action) {
            outcome.unreferenced.push(action);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTION: &str = "actionPolicymgrSubj";
    const REF: &str = "pconsRefDn";
    const PREFIX: &str = "pcons/refcont";

    fn action(o_dn: &str) -> ManagedObject {
        ManagedObject::new(ACTION)
            .with_attr("dn", format!("action/{o_dn}"))
            .with_attr("oDn", o_dn)
    }

    fn reference(dn: &str) -> ManagedObject {
        ManagedObject::new(REF).with_attr("dn", dn).with_attr("oCl", REF)
    }

    fn run<'a>(
        actions: &'a [ManagedObject],
        refs: &[ManagedObject],
        rule: JoinRule,
    ) -> JoinOutcome<'a> {
        cross_reference(actions, refs, ACTION, REF, PREFIX, rule)
    }

    #[test]
    fn test_literal_reference_present_no_mismatch() {
        let actions = [action("pcons/refcont/x")];
        let refs = [reference("pcons/refcont/unrelated")];
        let outcome = run(&actions, &refs, JoinRule::Literal);
        assert_eq!(outcome.checked, 1);
        assert!(outcome.unreferenced.is_empty());
    }

    #[test]
    fn test_literal_empty_reference_set_is_mismatch() {
        let actions = [action("pcons/refcont/x")];
        let outcome = run(&actions, &[], JoinRule::Literal);
        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.unreferenced, vec![&actions[0]]);
    }

    #[test]
    fn test_literal_requires_reference_ocl() {
        let actions = [action("pcons/refcont/x")];
        let refs = [ManagedObject::new(REF).with_attr("dn", "pcons/refcont/x")];
        let outcome = run(&actions, &refs, JoinRule::Literal);
        assert_eq!(outcome.unreferenced.len(), 1);
    }

    #[test]
    fn test_literal_prefix_must_lead_the_action_odn() {
        // Contains the prefix (so it is checked) but does not start with it.
        let actions = [action("uni/pcons/refcont/x")];
        let refs = [reference("pcons/refcont/x")];
        let outcome = run(&actions, &refs, JoinRule::Literal);
        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.unreferenced.len(), 1);
    }

    #[test]
    fn test_non_candidates_are_ignored() {
        let actions = [
            action("uni/tn-common/ctx-default"),
            ManagedObject::new("actionTopomgrSubj").with_attr("oDn", "pcons/refcont/x"),
            ManagedObject::new(ACTION).with_attr("dn", "no-odn"),
        ];
        let outcome = run(&actions, &[], JoinRule::Literal);
        assert_eq!(outcome.checked, 0);
        assert!(outcome.unreferenced.is_empty());
    }

    #[test]
    fn test_dn_lookup_matches_exact_dn() {
        let actions = [action("pcons/refcont/a"), action("pcons/refcont/b")];
        let refs = [reference("pcons/refcont/a")];
        let outcome = run(&actions, &refs, JoinRule::DnLookup);
        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.unreferenced, vec![&actions[1]]);
    }

    #[test]
    fn test_dn_lookup_ignores_ocl() {
        let actions = [action("pcons/refcont/a")];
        let refs = [ManagedObject::new(REF).with_attr("dn", "pcons/refcont/a")];
        let outcome = run(&actions, &refs, JoinRule::DnLookup);
        assert!(outcome.unreferenced.is_empty());
    }

    #[test]
    fn test_unreferenced_keeps_input_order() {
        let actions = [
            action("pcons/refcont/3"),
            action("pcons/refcont/1"),
            action("pcons/refcont/2"),
        ];
        let outcome = run(&actions, &[], JoinRule::DnLookup);
        let order: Vec<&str> = outcome.unreferenced.iter().filter_map(|a| a.o_dn()).collect();
        assert_eq!(order, vec!["pcons/refcont/3", "pcons/refcont/1", "pcons/refcont/2"]);
    }
}
