//! Structured profiling for state transitions
//!
//! Counts derivation work during transitions when enabled via
//! `EngineConfig::enable_profiling`. Zero overhead when disabled — all
//! instrumentation is gated on `Option::None`. The counters are what makes
//! truth-history cache reuse observable from tests.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Derivation counters collected across an engine's lifetime
#[derive(Debug, Default)]
pub struct TransitionProfile {
    initial_states: AtomicUsize,
    successors: AtomicUsize,
    legality_checks: AtomicUsize,
}

impl TransitionProfile {
    /// Number of initial-state derivations (`init/1` sweeps)
    pub fn initial_states(&self) -> usize {
        self.initial_states.load(Ordering::Relaxed)
    }

    /// Number of successor derivations (`next/1` sweeps)
    pub fn successors(&self) -> usize {
        self.successors.load(Ordering::Relaxed)
    }

    /// Number of single-move legality proofs
    pub fn legality_checks(&self) -> usize {
        self.legality_checks.load(Ordering::Relaxed)
    }

    pub(crate) fn count_initial_state(&self) {
        self.initial_states.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_successor(&self) {
        self.successors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_legality_check(&self) {
        self.legality_checks.fetch_add(1, Ordering::Relaxed);
    }
}
