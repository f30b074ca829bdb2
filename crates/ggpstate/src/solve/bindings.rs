//! Binding frames for proof search
//!
//! A frame maps variable slots to terms. Every assignment is recorded in a
//! trail so backtracking can restore any earlier checkpoint by undoing
//! assignments and releasing slots. Unification never fails with an error;
//! it returns `false` and leaves the frame to be restored by the caller.

use crate::gdl::term::{Term, Var};

/// A restore point into a binding frame
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    slots_len: usize,
    trail_len: usize,
}

/// Variable bindings with an undo trail
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    slots: Vec<Option<Term>>,
    trail: Vec<Var>,
}

impl Bindings {
    /// A frame with `slots` unbound variables
    pub fn new(slots: u32) -> Self {
        Bindings {
            slots: vec![None; slots as usize],
            trail: Vec::new(),
        }
    }

    /// Allocate `count` fresh unbound slots, returning the offset of the
    /// first. Clause instantiation shifts clause-local variables by this.
    pub fn alloc(&mut self, count: u32) -> u32 {
        let offset = self.slots.len() as u32;
        self.slots.resize(self.slots.len() + count as usize, None);
        offset
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            slots_len: self.slots.len(),
            trail_len: self.trail.len(),
        }
    }

    /// Undo all assignments and allocations made since the checkpoint
    pub fn restore(&mut self, checkpoint: &Checkpoint) {
        for var in self.trail.drain(checkpoint.trail_len..) {
            self.slots[var.ord()] = None;
        }
        self.slots.truncate(checkpoint.slots_len);
    }

    /// Chase variable bindings until an unbound variable or a non-variable
    /// term is reached. Substitution is applied on the fly; no copies.
    pub fn walk<'t>(&'t self, mut term: &'t Term) -> &'t Term {
        while let Term::Var(v) = term {
            match self.slots[v.ord()].as_ref() {
                Some(bound) => term = bound,
                None => break,
            }
        }
        term
    }

    /// Deep copy of `term` with all bound variables substituted away
    pub fn resolve(&self, term: &Term) -> Term {
        match self.walk(term) {
            Term::Compound(f, args) => {
                Term::Compound(*f, args.iter().map(|a| self.resolve(a)).collect())
            }
            other => other.clone(),
        }
    }

    fn bind(&mut self, var: Var, term: Term) {
        debug_assert!(self.slots[var.ord()].is_none());
        self.slots[var.ord()] = Some(term);
        self.trail.push(var);
    }

    /// Unify two terms, extending this frame.
    ///
    /// The occurs check is deliberately not performed: GDL rule-sets never
    /// need it and proof search is dominated by unification cost. On `false`
    /// the frame holds partial bindings; restore the caller's checkpoint.
    pub fn unify(&mut self, left: &Term, right: &Term) -> bool {
        let left = self.walk(left).clone();
        let right = self.walk(right).clone();
        match (left, right) {
            (Term::Var(x), Term::Var(y)) => {
                if x != y {
                    self.bind(x, Term::Var(y));
                }
                true
            }
            (Term::Var(x), t) | (t, Term::Var(x)) => {
                self.bind(x, t);
                true
            }
            (Term::Atom(p), Term::Atom(q)) => p == q,
            (Term::Int(m), Term::Int(n)) => m == n,
            (Term::Compound(f, fargs), Term::Compound(g, gargs)) => {
                f == g
                    && fargs.len() == gargs.len()
                    && fargs
                        .iter()
                        .zip(gargs.iter())
                        .all(|(a, b)| self.unify(a, b))
            }
            _ => false,
        }
    }
}
