//! GGPState: a game state engine for general game playing
//!
//! This library evaluates games written in the Game Description Language
//! (GDL), consumed as already-parsed term trees. Installing a game analyses
//! which predicates depend on the current position, rewrites their clauses to
//! carry an explicit truth state and move set, and indexes the result. Query
//! operations then resolve goals against any caller-supplied state with a
//! backtracking SLD resolver, and the transition engine derives successor
//! states, legality verdicts, and cached play histories on top of it.

pub mod analysis;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod gdl;
pub mod solve;

// Re-export commonly used types
pub use config::EngineConfig;
pub use db::GameRecord;
pub use engine::{Engine, TransitionProfile, MAX_UTILITY, MIN_UTILITY};
pub use error::{EngineError, Result};
pub use gdl::{
    AtomId, Clause, CompiledClause, HistoryEntry, MoveVector, Pred, SymbolTable, Term,
    TruthHistory, TruthState, Var, WellKnown,
};
pub use solve::{Answer, Answers, Step};
