//! Truth states, move vectors, and play histories
//!
//! A truth state is the set of ground facts holding in one position. A
//! prepared move vector is a joint move, one `does/2` per role, in canonical
//! role order. A truth history records the trajectory of a playthrough,
//! newest entry first so the current state is O(1) to reach.

use super::symbols::WellKnown;
use super::term::Term;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The set of ground facts true in one game position.
///
/// Backed by an `IndexSet`: deduplicated, deterministic iteration order, and
/// order-insensitive equality — two truth states compare equal iff they hold
/// the same facts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TruthState {
    facts: IndexSet<Term>,
}

impl TruthState {
    pub fn new() -> Self {
        TruthState {
            facts: IndexSet::new(),
        }
    }

    /// Insert a fact; duplicates are absorbed
    pub fn insert(&mut self, fact: Term) {
        self.facts.insert(fact);
    }

    pub fn contains(&self, fact: &Term) -> bool {
        self.facts.contains(fact)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.facts.iter()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Render this state as a list term for use inside `state/4` goals
    pub fn to_list_term(&self, well: &WellKnown) -> Term {
        Term::list(self.facts.iter().cloned(), well)
    }
}

impl FromIterator<Term> for TruthState {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        TruthState {
            facts: iter.into_iter().collect(),
        }
    }
}

/// A joint move: one `does(Role, Action)` per role, in canonical role order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveVector {
    moves: Vec<Term>,
}

impl MoveVector {
    /// Wrap an already role-ordered move list.
    /// Use `Engine::prepare_moves` to order an arbitrary one.
    pub fn new(moves: Vec<Term>) -> Self {
        MoveVector { moves }
    }

    pub fn moves(&self) -> &[Term] {
        &self.moves
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Render this vector as a list term for use inside `state/4` goals
    pub fn to_list_term(&self, well: &WellKnown) -> Term {
        Term::list(self.moves.iter().cloned(), well)
    }
}

/// One step of a truth history: the joint move that produced the state.
/// The oldest entry has no move — it is the `start` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub moves: Option<MoveVector>,
    pub state: TruthState,
}

/// The trajectory of a playthrough, newest entry first.
///
/// Entry `i` from the oldest end is the position reached after applying the
/// first `i` move vectors to the initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthHistory {
    entries: Vec<HistoryEntry>,
}

impl TruthHistory {
    /// A fresh history holding only the initial state
    pub fn initial(state: TruthState) -> Self {
        TruthHistory {
            entries: vec![HistoryEntry { moves: None, state }],
        }
    }

    pub(crate) fn from_entries_newest_first(entries: Vec<HistoryEntry>) -> Self {
        debug_assert!(!entries.is_empty());
        TruthHistory { entries }
    }

    /// The newest truth state
    pub fn final_truth_state(&self) -> &TruthState {
        &self.entries[0].state
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries, oldest first
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Number of moves applied since the initial state
    pub fn turn_number(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdl::SymbolTable;

    #[test]
    fn truth_state_equality_ignores_order() {
        let mut symbols = SymbolTable::new();
        let a = Term::Atom(symbols.intern("a"));
        let b = Term::Atom(symbols.intern("b"));

        let s1: TruthState = vec![a.clone(), b.clone()].into_iter().collect();
        let s2: TruthState = vec![b, a.clone()].into_iter().collect();
        assert_eq!(s1, s2);

        let s3: TruthState = vec![a].into_iter().collect();
        assert_ne!(s1, s3);
    }

    #[test]
    fn truth_state_deduplicates() {
        let mut symbols = SymbolTable::new();
        let a = Term::Atom(symbols.intern("a"));
        let s: TruthState = vec![a.clone(), a].into_iter().collect();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn history_orders_newest_first() {
        let mut symbols = SymbolTable::new();
        let a = Term::Atom(symbols.intern("a"));
        let b = Term::Atom(symbols.intern("b"));

        let s0: TruthState = vec![a].into_iter().collect();
        let s1: TruthState = vec![b.clone()].into_iter().collect();
        let history = TruthHistory::from_entries_newest_first(vec![
            HistoryEntry {
                moves: Some(MoveVector::new(vec![b])),
                state: s1.clone(),
            },
            HistoryEntry {
                moves: None,
                state: s0.clone(),
            },
        ]);

        assert_eq!(history.turn_number(), 1);
        assert_eq!(history.final_truth_state(), &s1);
        let oldest: Vec<_> = history.iter_oldest_first().collect();
        assert_eq!(oldest[0].state, s0);
        assert!(oldest[0].moves.is_none());
    }
}
