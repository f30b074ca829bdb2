//! Proof search: binding frames, built-ins, and the SLD resolver

pub mod bindings;
pub mod builtins;
pub mod solver;

#[cfg(test)]
mod proptest_tests;

pub use bindings::Bindings;
pub use builtins::{Builtin, BuiltinCall};
pub use solver::{Answer, Answers, Step};
