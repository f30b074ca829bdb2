//! Clause rewriting: threading game state through state-dependent rules
//!
//! A state-dependent clause gains three leading arguments on its head — the
//! game id, the truth state, and the move set — packed under the
//! `state_dynamic/4` wrapper. In bodies, `does(R, A)` becomes a lookup in the
//! move set and every state-dependent literal becomes a `state/4` invocation
//! of the engine's state-aware evaluator. The same body rewrite, with the
//! concrete truth and move lists in place of variables, turns a caller query
//! into a goal the resolver can run directly.

use crate::gdl::clause::CompiledClause;
use crate::gdl::symbols::{AtomId, WellKnown};
use crate::gdl::term::{Pred, Term};
use std::collections::HashSet;

/// Rewrites clauses and queries of one game against its state-dependent
/// predicate set
pub struct Stateifier<'a> {
    game: AtomId,
    sdp: &'a HashSet<Pred>,
    well: &'a WellKnown,
}

impl<'a> Stateifier<'a> {
    pub fn new(game: AtomId, sdp: &'a HashSet<Pred>, well: &'a WellKnown) -> Self {
        Stateifier { game, sdp, well }
    }

    /// Whether this clause defines a state-dependent predicate
    pub fn is_dynamic(&self, clause: &CompiledClause) -> bool {
        clause
            .head_pred()
            .is_some_and(|pred| self.sdp.contains(&pred))
    }

    /// Rewrite a state-dependent clause.
    ///
    /// The truth-state and move-set variables are the two slots past the
    /// clause's own, so they thread unchanged through head and body.
    pub fn rewrite_clause(&self, clause: &CompiledClause) -> CompiledClause {
        let truth = Term::var(clause.var_slots);
        let moves = Term::var(clause.var_slots + 1);

        let head = self.wrap(self.well.state_dynamic, clause.head.clone(), &truth, &moves);
        let body = clause
            .body
            .iter()
            .map(|literal| self.rewrite_literal(literal, &truth, &moves))
            .collect();

        CompiledClause {
            head,
            body,
            var_slots: clause.var_slots + 2,
        }
    }

    /// Rewrite a caller query against concrete truth and move list terms
    pub fn rewrite_query(&self, query: &Term, truth: &Term, moves: &Term) -> Term {
        self.rewrite_literal(query, truth, moves)
    }

    fn rewrite_literal(&self, literal: &Term, truth: &Term, moves: &Term) -> Term {
        match literal {
            Term::Compound(f, args) => {
                // Connectives recurse; their arguments are goals, not data.
                if (*f == self.well.not && args.len() == 1)
                    || ((*f == self.well.or || *f == self.well.and) && args.len() == 2)
                {
                    return Term::Compound(
                        *f,
                        args.iter()
                            .map(|arg| self.rewrite_literal(arg, truth, moves))
                            .collect(),
                    );
                }
                // Aggregates carry a goal in second position; template and
                // result are data.
                if (*f == self.well.findall || *f == self.well.setof || *f == self.well.bagof)
                    && args.len() == 3
                {
                    return Term::Compound(
                        *f,
                        vec![
                            args[0].clone(),
                            self.rewrite_literal(&args[1], truth, moves),
                            args[2].clone(),
                        ],
                    );
                }
                if *f == self.well.does && args.len() == 2 {
                    // does(R, A)  ==>  member(does(R, A), Moves)
                    return Term::Compound(
                        self.well.member,
                        vec![literal.clone(), moves.clone()],
                    );
                }
                self.rewrite_predicate(literal, truth, moves)
            }
            Term::Atom(_) => self.rewrite_predicate(literal, truth, moves),
            other => other.clone(),
        }
    }

    fn rewrite_predicate(&self, literal: &Term, truth: &Term, moves: &Term) -> Term {
        match literal.functor() {
            Some(pred) if self.sdp.contains(&pred) => {
                self.wrap(self.well.state, literal.clone(), truth, moves)
            }
            _ => literal.clone(),
        }
    }

    fn wrap(&self, wrapper: AtomId, inner: Term, truth: &Term, moves: &Term) -> Term {
        Term::Compound(
            wrapper,
            vec![Term::Atom(self.game), truth.clone(), moves.clone(), inner],
        )
    }
}
