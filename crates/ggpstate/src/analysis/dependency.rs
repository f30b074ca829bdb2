//! State-dependent predicate analysis
//!
//! A predicate is state-dependent iff it is `true/1` or `does/2`, or some
//! clause defining it has a body that reaches a state-dependent predicate —
//! either as a literal's top functor or embedded anywhere inside a compound
//! argument (GDL permits nesting). Computed once per game at install time.

use crate::gdl::clause::Clause;
use crate::gdl::symbols::WellKnown;
use crate::gdl::term::Pred;
use std::collections::HashSet;

/// Compute the state-dependent predicate set of a rule-set.
///
/// Runs a monotone fixpoint over the clause list: the set only grows and is
/// bounded by the predicates occurring in the rule-set, so mutually recursive
/// definitions terminate without any special handling.
pub fn state_dependent_predicates(clauses: &[Clause], well: &WellKnown) -> HashSet<Pred> {
    let mut sdp = HashSet::new();
    sdp.insert(Pred::new(well.true_, 1));
    sdp.insert(Pred::new(well.does, 2));

    loop {
        let mut grew = false;
        for clause in clauses {
            let head = match clause.head.functor() {
                Some(pred) => pred,
                None => continue,
            };
            if sdp.contains(&head) {
                continue;
            }
            if clause.body.iter().any(|literal| literal.mentions_any(&sdp)) {
                sdp.insert(head);
                grew = true;
            }
        }
        if !grew {
            return sdp;
        }
    }
}
