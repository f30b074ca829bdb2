//! Error types for the game state engine

use crate::gdl::Term;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A rule-set clause that cannot be installed; carries the offending term
    #[error("malformed clause: {reason}")]
    MalformedClause { clause: Term, reason: String },

    #[error("unknown game: {0}")]
    UnknownGame(String),

    /// A move failed its legality check during a state transition
    #[error("illegal move: {role:?} does {action:?}")]
    IllegalMove { role: Term, action: Term },

    /// Prepared moves do not cover the game's roles exactly once each
    #[error("move roles do not match game roles")]
    RoleMismatch { expected: Vec<Term>, provided: Vec<Term> },

    /// Negation-as-failure reached a goal with unbound variables
    #[error("unbound variable in negated goal {0:?}")]
    UnboundInNegation(Term),

    /// `distinct/2` evaluated before both arguments were ground
    #[error("unbound variable in distinct: {0:?}")]
    UnboundInDistinct(Term),
}

pub type Result<T> = std::result::Result<T, EngineError>;
