//! The fixed built-in predicate catalogue
//!
//! The resolver dispatches on a tagged classification instead of
//! string-matching functor names on every call. Control shapes (`,`, `or`,
//! `member`) become choice points in the solver; the single-shot calls
//! (`distinct`, `not`, the aggregates, `succ`) are evaluated natively.

use crate::gdl::symbols::WellKnown;
use crate::gdl::term::Term;

/// A goal recognized as a built-in, with its arguments extracted
#[derive(Debug, Clone)]
pub enum Builtin {
    /// `','(A, B)` — both goals, in order
    Conjunction(Term, Term),
    /// `or(A, B)` — two alternatives
    Disjunction(Term, Term),
    /// `member(X, L)` — one alternative per list element
    Member { item: Term, list: Term },
    /// The atom `true` — trivial success
    TrueGoal,
    /// A single-shot native call
    Call(BuiltinCall),
}

/// Built-ins that succeed at most once and are evaluated natively
#[derive(Debug, Clone)]
pub enum BuiltinCall {
    /// `distinct(X, Y)` — ground inequality
    Distinct(Term, Term),
    /// `not(G)` — negation as finite failure
    Not(Term),
    /// `findall(Template, Goal, Out)` — `[]` on no solutions
    Findall { template: Term, goal: Term, out: Term },
    /// `bagof(Template, Goal, Out)` — fails on no solutions
    Bagof { template: Term, goal: Term, out: Term },
    /// `setof(Template, Goal, Out)` — sorted, deduplicated, fails on none
    Setof { template: Term, goal: Term, out: Term },
    /// `succ(X, Y)` — integer successor, either argument bound
    Succ(Term, Term),
}

/// Classify a goal term against the built-in catalogue.
///
/// Returns `None` for ordinary predicates (clause lookup) and for the
/// `state/4` wrappers, which the solver resolves itself.
pub fn recognize(goal: &Term, well: &WellKnown) -> Option<Builtin> {
    match goal {
        Term::Atom(a) if *a == well.true_ => Some(Builtin::TrueGoal),
        Term::Compound(f, args) => match (args.len(), *f) {
            (2, f) if f == well.and => {
                Some(Builtin::Conjunction(args[0].clone(), args[1].clone()))
            }
            (2, f) if f == well.or => {
                Some(Builtin::Disjunction(args[0].clone(), args[1].clone()))
            }
            (2, f) if f == well.member => Some(Builtin::Member {
                item: args[0].clone(),
                list: args[1].clone(),
            }),
            (2, f) if f == well.distinct => Some(Builtin::Call(BuiltinCall::Distinct(
                args[0].clone(),
                args[1].clone(),
            ))),
            (1, f) if f == well.not => {
                Some(Builtin::Call(BuiltinCall::Not(args[0].clone())))
            }
            (2, f) if f == well.succ => Some(Builtin::Call(BuiltinCall::Succ(
                args[0].clone(),
                args[1].clone(),
            ))),
            (3, f) if f == well.findall => Some(Builtin::Call(BuiltinCall::Findall {
                template: args[0].clone(),
                goal: args[1].clone(),
                out: args[2].clone(),
            })),
            (3, f) if f == well.bagof => Some(Builtin::Call(BuiltinCall::Bagof {
                template: args[0].clone(),
                goal: args[1].clone(),
                out: args[2].clone(),
            })),
            (3, f) if f == well.setof => Some(Builtin::Call(BuiltinCall::Setof {
                template: args[0].clone(),
                goal: args[1].clone(),
                out: args[2].clone(),
            })),
            _ => None,
        },
        _ => None,
    }
}

/// Integer successor: the `(target, value)` pair to unify when one argument
/// is an integer, `None` when neither is
pub fn succ_solution(x: &Term, y: &Term) -> Option<(Term, Term)> {
    match (x, y) {
        (Term::Int(n), _) => Some((y.clone(), Term::Int(n + 1))),
        (_, Term::Int(n)) if *n > 0 => Some((x.clone(), Term::Int(n - 1))),
        _ => None,
    }
}

/// `setof` post-processing: sort solutions by term order and drop duplicates
pub fn sort_dedup(mut solutions: Vec<Term>) -> Vec<Term> {
    solutions.sort();
    solutions.dedup();
    solutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdl::SymbolTable;

    #[test]
    fn recognizes_the_catalogue() {
        let mut symbols = SymbolTable::new();
        let well = *symbols.well_known();
        let a = Term::Atom(symbols.intern("a"));
        let b = Term::Atom(symbols.intern("b"));

        let distinct = Term::Compound(well.distinct, vec![a.clone(), b.clone()]);
        assert!(matches!(
            recognize(&distinct, &well),
            Some(Builtin::Call(BuiltinCall::Distinct(_, _)))
        ));

        let not = Term::Compound(well.not, vec![a.clone()]);
        assert!(matches!(
            recognize(&not, &well),
            Some(Builtin::Call(BuiltinCall::Not(_)))
        ));

        let or = Term::Compound(well.or, vec![a.clone(), b.clone()]);
        assert!(matches!(recognize(&or, &well), Some(Builtin::Disjunction(_, _))));

        assert!(matches!(
            recognize(&Term::Atom(well.true_), &well),
            Some(Builtin::TrueGoal)
        ));

        // Ordinary predicates fall through to clause lookup.
        let plain = Term::Compound(symbols.intern("cell"), vec![a, b]);
        assert!(recognize(&plain, &well).is_none());
    }

    #[test]
    fn arity_must_match() {
        let mut symbols = SymbolTable::new();
        let well = *symbols.well_known();
        let a = Term::Atom(symbols.intern("a"));
        // distinct/3 is not the built-in
        let odd = Term::Compound(well.distinct, vec![a.clone(), a.clone(), a]);
        assert!(recognize(&odd, &well).is_none());
    }

    #[test]
    fn succ_works_in_both_directions() {
        let x = Term::Int(3);
        let (target, value) = succ_solution(&x, &Term::Var(crate::gdl::Var(0))).unwrap();
        assert_eq!(target, Term::Var(crate::gdl::Var(0)));
        assert_eq!(value, Term::Int(4));

        let y = Term::Int(3);
        let (target, value) = succ_solution(&Term::Var(crate::gdl::Var(0)), &y).unwrap();
        assert_eq!(target, Term::Var(crate::gdl::Var(0)));
        assert_eq!(value, Term::Int(2));

        assert!(succ_solution(
            &Term::Var(crate::gdl::Var(0)),
            &Term::Var(crate::gdl::Var(1))
        )
        .is_none());
    }

    #[test]
    fn sort_dedup_orders_and_collapses() {
        let solutions = vec![Term::Int(3), Term::Int(1), Term::Int(3), Term::Int(2)];
        assert_eq!(
            sort_dedup(solutions),
            vec![Term::Int(1), Term::Int(2), Term::Int(3)]
        );
    }
}
