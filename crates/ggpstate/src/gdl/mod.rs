//! Game description data structures
//!
//! This module provides the fundamental types for representing GDL rule-sets
//! and positions: interned symbols, terms, clauses, truth states, and play
//! histories.

pub mod clause;
pub mod state;
pub mod symbols;
pub mod term;

// Re-export commonly used types
pub use clause::{Clause, CompiledClause};
pub use state::{HistoryEntry, MoveVector, TruthHistory, TruthState};
pub use symbols::{AtomId, SymbolTable, WellKnown};
pub use term::{Pred, Term, TermDisplay, Var};
