//! Rule-set analysis: state dependency and clause rewriting

pub mod dependency;
pub mod stateify;

pub use dependency::state_dependent_predicates;
pub use stateify::Stateifier;
