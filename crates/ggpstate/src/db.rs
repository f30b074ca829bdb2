//! Per-game rule database
//!
//! Installing a game compiles its rule-set into an immutable `GameRecord`:
//! clauses are normalized, variables renumbered, the state-dependent
//! predicate set computed, and state-dependent clauses rewritten. Clauses are
//! indexed by head functor — the dynamic table by the functor *inside* the
//! `state_dynamic/4` wrapper, which is the index the resolver probes.
//!
//! Records are shared behind `Arc`: installation builds a whole new record
//! and publish-replaces it in the engine's game table, so in-flight queries
//! keep reading their snapshot.

use crate::analysis::{state_dependent_predicates, Stateifier};
use crate::error::Result;
use crate::gdl::clause::{Clause, CompiledClause};
use crate::gdl::symbols::{AtomId, WellKnown};
use crate::gdl::term::{Pred, Term};
use std::collections::{HashMap, HashSet};

/// One game's compiled and indexed rule-set
#[derive(Debug, Clone)]
pub struct GameRecord {
    id: AtomId,
    roles: Vec<Term>,
    sdp: HashSet<Pred>,
    statics: HashMap<Pred, Vec<CompiledClause>>,
    dynamics: HashMap<Pred, Vec<CompiledClause>>,
}

impl GameRecord {
    /// Compile and index a rule-set. Role discovery happens afterwards,
    /// by querying the freshly built record.
    pub fn install(id: AtomId, rules: &[Term], well: &WellKnown) -> Result<GameRecord> {
        let clauses = rules
            .iter()
            .map(|rule| Clause::from_term(rule, well))
            .collect::<Result<Vec<_>>>()?;

        let sdp = state_dependent_predicates(&clauses, well);
        let stateifier = Stateifier::new(id, &sdp, well);

        let mut statics: HashMap<Pred, Vec<CompiledClause>> = HashMap::new();
        let mut dynamics: HashMap<Pred, Vec<CompiledClause>> = HashMap::new();
        for clause in &clauses {
            let compiled = CompiledClause::compile(clause);
            // from_term guarantees the head has a functor
            let pred = compiled.head_pred().expect("clause head has a functor");
            if stateifier.is_dynamic(&compiled) {
                dynamics
                    .entry(pred)
                    .or_default()
                    .push(stateifier.rewrite_clause(&compiled));
            } else {
                statics.entry(pred).or_default().push(compiled);
            }
        }

        log::debug!(
            "installed game {:?}: {} clauses, {} state-dependent predicates",
            id,
            clauses.len(),
            sdp.len()
        );

        Ok(GameRecord {
            id,
            roles: Vec::new(),
            sdp,
            statics,
            dynamics,
        })
    }

    pub fn id(&self) -> AtomId {
        self.id
    }

    /// Canonical role order, as discovered from `role/1`
    pub fn roles(&self) -> &[Term] {
        &self.roles
    }

    pub(crate) fn set_roles(&mut self, roles: Vec<Term>) {
        self.roles = roles;
    }

    /// The state-dependent predicate set
    pub fn sdp(&self) -> &HashSet<Pred> {
        &self.sdp
    }

    /// Clauses of a position-independent predicate
    pub fn statics(&self, pred: Pred) -> &[CompiledClause] {
        self.statics.get(&pred).map_or(&[], Vec::as_slice)
    }

    /// Rewritten clauses whose inner head matches `pred`
    pub fn dynamics(&self, pred: Pred) -> &[CompiledClause] {
        self.dynamics.get(&pred).map_or(&[], Vec::as_slice)
    }

    /// A rewriter for queries against this record
    pub fn stateifier<'a>(&'a self, well: &'a WellKnown) -> Stateifier<'a> {
        Stateifier::new(self.id, &self.sdp, well)
    }
}
