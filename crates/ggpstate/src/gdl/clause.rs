//! Clauses: rules and facts of a game description
//!
//! Input clauses arrive as already-parsed term trees: either a bare head
//! (a fact) or a `:-`/2 compound (a rule). Conjunction `,`/2 in bodies is
//! flattened into the body list; disjunction `;`/2 is normalized to `or/2`.

use super::symbols::WellKnown;
use super::term::{Pred, Term, Var};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A clause: head plus a conjunction of body literals (empty for facts)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub head: Term,
    pub body: Vec<Term>,
}

impl Clause {
    /// Build a clause from an input term, normalizing its shape.
    ///
    /// Fails with `MalformedClause` when the head is not a predicate or a
    /// body literal can never be a goal (integer or unbound variable).
    pub fn from_term(term: &Term, well: &WellKnown) -> Result<Clause> {
        let (head, body_term) = match term {
            Term::Compound(f, args) if *f == well.implies && args.len() == 2 => {
                (&args[0], Some(&args[1]))
            }
            other => (other, None),
        };

        match head {
            Term::Atom(_) | Term::Compound(_, _) => {}
            _ => {
                return Err(EngineError::MalformedClause {
                    clause: term.clone(),
                    reason: "clause head must be an atom or compound".to_string(),
                })
            }
        }

        let mut body = Vec::new();
        if let Some(body_term) = body_term {
            flatten_conjunction(body_term, well, &mut body);
        }
        for literal in &body {
            check_literal(literal, term, well)?;
        }

        Ok(Clause {
            head: normalize_connectives(head, well),
            body: body
                .iter()
                .map(|l| normalize_connectives(l, well))
                .collect(),
        })
    }
}

/// Flatten a `,`/2 tree into a list of literals
fn flatten_conjunction(term: &Term, well: &WellKnown, out: &mut Vec<Term>) {
    match term {
        Term::Compound(f, args) if *f == well.and && args.len() == 2 => {
            flatten_conjunction(&args[0], well, out);
            flatten_conjunction(&args[1], well, out);
        }
        other => out.push(other.clone()),
    }
}

/// Replace `;`/2 with `or/2` throughout a term
fn normalize_connectives(term: &Term, well: &WellKnown) -> Term {
    match term {
        Term::Compound(f, args) => {
            let functor = if *f == well.semicolon && args.len() == 2 {
                well.or
            } else {
                *f
            };
            Term::Compound(
                functor,
                args.iter().map(|a| normalize_connectives(a, well)).collect(),
            )
        }
        other => other.clone(),
    }
}

fn check_literal(literal: &Term, clause: &Term, well: &WellKnown) -> Result<()> {
    match literal {
        Term::Atom(_) => Ok(()),
        Term::Compound(f, args) => {
            // Connectives are checked recursively; their arguments are goals.
            let is_connective = (*f == well.not && args.len() == 1)
                || ((*f == well.or || *f == well.semicolon || *f == well.and) && args.len() == 2);
            if is_connective {
                for arg in args {
                    let mut flat = Vec::new();
                    flatten_conjunction(arg, well, &mut flat);
                    for literal in &flat {
                        check_literal(literal, clause, well)?;
                    }
                }
            }
            Ok(())
        }
        Term::Var(_) | Term::Int(_) => Err(EngineError::MalformedClause {
            clause: clause.clone(),
            reason: "body literal must be an atom or compound".to_string(),
        }),
    }
}

/// A clause with variables renumbered to a dense `0..var_slots` range,
/// ready to be instantiated into a frame at any offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledClause {
    pub head: Term,
    pub body: Vec<Term>,
    pub var_slots: u32,
}

impl CompiledClause {
    /// Renumber clause variables in order of first occurrence
    pub fn compile(clause: &Clause) -> CompiledClause {
        let mut renaming = HashMap::new();
        let head = renumber(&clause.head, &mut renaming);
        let body = clause.body.iter().map(|l| renumber(l, &mut renaming)).collect();
        CompiledClause {
            head,
            body,
            var_slots: renaming.len() as u32,
        }
    }

    /// The predicate this clause defines
    pub fn head_pred(&self) -> Option<Pred> {
        self.head.functor()
    }
}

fn renumber(term: &Term, renaming: &mut HashMap<Var, u32>) -> Term {
    match term {
        Term::Var(v) => {
            let next = renaming.len() as u32;
            Term::Var(Var(*renaming.entry(*v).or_insert(next)))
        }
        Term::Atom(_) | Term::Int(_) => term.clone(),
        Term::Compound(f, args) => {
            Term::Compound(*f, args.iter().map(|a| renumber(a, renaming)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdl::SymbolTable;

    use std::cell::RefCell;

    struct TestContext {
        symbols: RefCell<SymbolTable>,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                symbols: RefCell::new(SymbolTable::new()),
            }
        }

        fn well(&self) -> crate::gdl::WellKnown {
            *self.symbols.borrow().well_known()
        }

        fn atom(&self, name: &str) -> Term {
            Term::Atom(self.symbols.borrow_mut().intern(name))
        }

        fn app(&self, name: &str, args: Vec<Term>) -> Term {
            Term::Compound(self.symbols.borrow_mut().intern(name), args)
        }

        fn rule(&self, head: Term, body: Term) -> Term {
            Term::Compound(self.well().implies, vec![head, body])
        }
    }

    #[test]
    fn fact_has_empty_body() {
        let ctx = TestContext::new();
        let fact = ctx.app("role", vec![ctx.atom("robot")]);
        let clause = Clause::from_term(&fact, &ctx.well()).unwrap();
        assert_eq!(clause.head, fact);
        assert!(clause.body.is_empty());
    }

    #[test]
    fn rule_body_conjunction_is_flattened() {
        let ctx = TestContext::new();
        let head = ctx.app("next", vec![ctx.atom("p")]);
        let a = ctx.app("true", vec![ctx.atom("q")]);
        let b = ctx.app("does", vec![ctx.atom("robot"), ctx.atom("a")]);
        let c = ctx.atom("terminal");
        let body = ctx.app(",", vec![a.clone(), ctx.app(",", vec![b.clone(), c.clone()])]);
        let rule = ctx.rule(head.clone(), body);

        let clause = Clause::from_term(&rule, &ctx.well()).unwrap();
        assert_eq!(clause.head, head);
        assert_eq!(clause.body, vec![a, b, c]);
    }

    #[test]
    fn semicolon_normalizes_to_or() {
        let ctx = TestContext::new();
        let head = ctx.app("p", vec![Term::var(0)]);
        let l = ctx.app("q", vec![Term::var(0)]);
        let r = ctx.app("r", vec![Term::var(0)]);
        let rule = ctx.rule(head, ctx.app(";", vec![l, r]));
        let well = ctx.well();

        let clause = Clause::from_term(&rule, &well).unwrap();
        match &clause.body[0] {
            Term::Compound(f, args) => {
                assert_eq!(*f, well.or);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected or/2, got {:?}", other),
        }
    }

    #[test]
    fn integer_head_is_malformed() {
        let ctx = TestContext::new();
        let err = Clause::from_term(&Term::Int(7), &ctx.well()).unwrap_err();
        assert!(matches!(err, EngineError::MalformedClause { .. }));
    }

    #[test]
    fn variable_body_literal_is_malformed() {
        let ctx = TestContext::new();
        let rule = ctx.rule(ctx.atom("p"), Term::var(0));
        let err = Clause::from_term(&rule, &ctx.well()).unwrap_err();
        assert!(matches!(err, EngineError::MalformedClause { .. }));
    }

    #[test]
    fn compile_renumbers_in_first_occurrence_order() {
        let ctx = TestContext::new();
        let head = ctx.app("p", vec![Term::var(7), Term::var(3)]);
        let body = ctx.app("q", vec![Term::var(3), Term::var(9)]);
        let rule = ctx.rule(head, body);

        let clause = Clause::from_term(&rule, &ctx.well()).unwrap();
        let compiled = CompiledClause::compile(&clause);
        assert_eq!(compiled.var_slots, 3);
        let expected_head = ctx.app("p", vec![Term::var(0), Term::var(1)]);
        let expected_body = ctx.app("q", vec![Term::var(1), Term::var(2)]);
        assert_eq!(compiled.head, expected_head);
        assert_eq!(compiled.body, vec![expected_body]);
    }
}
