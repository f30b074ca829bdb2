//! Property-based tests for the unifier using proptest.

use super::bindings::Bindings;
use crate::gdl::{SymbolTable, Term};
use proptest::prelude::*;

/// Term description (before interning)
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),                 // Variable ordinal 0-3
    Atom(u8),                // Atom index 0-3
    Int(i8),                 // Small integer
    App(u8, Vec<TermDesc>),  // Functor index 0-1, with args
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    if max_depth == 0 {
        prop_oneof![
            (0..4u8).prop_map(TermDesc::Var),
            (0..4u8).prop_map(TermDesc::Atom),
            (-3..4i8).prop_map(TermDesc::Int),
        ]
        .boxed()
    } else {
        prop_oneof![
            3 => (0..4u8).prop_map(TermDesc::Var),
            3 => (0..4u8).prop_map(TermDesc::Atom),
            2 => (-3..4i8).prop_map(TermDesc::Int),
            2 => (
                0..2u8,
                proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=3)
            )
                .prop_map(|(f, args)| TermDesc::App(f, args)),
        ]
        .boxed()
    }
}

fn build_term(desc: &TermDesc, symbols: &mut SymbolTable) -> Term {
    match desc {
        TermDesc::Var(i) => Term::var(u32::from(*i)),
        TermDesc::Atom(i) => Term::Atom(symbols.intern(&format!("a{}", i))),
        TermDesc::Int(n) => Term::Int(i64::from(*n)),
        TermDesc::App(f, args) => Term::Compound(
            symbols.intern(&format!("f{}", f)),
            args.iter().map(|arg| build_term(arg, symbols)).collect(),
        ),
    }
}

/// The same description with variables replaced by atoms, making it ground
fn build_ground(desc: &TermDesc, symbols: &mut SymbolTable) -> Term {
    match desc {
        TermDesc::Var(i) => Term::Atom(symbols.intern(&format!("g{}", i))),
        TermDesc::Atom(_) | TermDesc::Int(_) => build_term(desc, symbols),
        TermDesc::App(f, args) => Term::Compound(
            symbols.intern(&format!("f{}", f)),
            args.iter().map(|arg| build_ground(arg, symbols)).collect(),
        ),
    }
}

proptest! {
    /// A successful unification makes both sides resolve to the same term
    /// (the right side is ground, so resolution terminates).
    #[test]
    fn unification_equates_pattern_and_ground_term(
        pattern_desc in arb_term_desc(3),
        ground_desc in arb_term_desc(3),
    ) {
        let mut symbols = SymbolTable::new();
        let pattern = build_term(&pattern_desc, &mut symbols);
        let ground = build_ground(&ground_desc, &mut symbols);
        prop_assert!(ground.is_ground());

        let mut frame = Bindings::new(4);
        if frame.unify(&pattern, &ground) {
            prop_assert_eq!(frame.resolve(&pattern), ground);
        }
    }

    /// Unification success is symmetric.
    #[test]
    fn unification_is_symmetric(
        left_desc in arb_term_desc(3),
        right_desc in arb_term_desc(3),
    ) {
        let mut symbols = SymbolTable::new();
        let left = build_term(&left_desc, &mut symbols);
        let right = build_term(&right_desc, &mut symbols);

        let forward = Bindings::new(4).unify(&left, &right);
        let backward = Bindings::new(4).unify(&right, &left);
        prop_assert_eq!(forward, backward);
    }

    /// Ground terms unify exactly when they are equal.
    #[test]
    fn ground_unification_is_equality(
        left_desc in arb_term_desc(3),
        right_desc in arb_term_desc(3),
    ) {
        let mut symbols = SymbolTable::new();
        let left = build_ground(&left_desc, &mut symbols);
        let right = build_ground(&right_desc, &mut symbols);

        let mut frame = Bindings::new(0);
        prop_assert_eq!(frame.unify(&left, &right), left == right);
    }

    /// Restoring a checkpoint after a failed attempt leaves the frame as
    /// usable as a fresh one.
    #[test]
    fn restore_discards_partial_bindings(
        pattern_desc in arb_term_desc(3),
        ground_desc in arb_term_desc(3),
    ) {
        let mut symbols = SymbolTable::new();
        let pattern = build_term(&pattern_desc, &mut symbols);
        let ground = build_ground(&ground_desc, &mut symbols);

        let mut frame = Bindings::new(4);
        let checkpoint = frame.checkpoint();
        let _ = frame.unify(&pattern, &ground);
        frame.restore(&checkpoint);

        // Every variable is unbound again.
        for ord in 0..4 {
            prop_assert_eq!(frame.resolve(&Term::var(ord)), Term::var(ord));
        }

        // And a fresh frame agrees with the retried unification.
        let mut fresh = Bindings::new(4);
        prop_assert_eq!(frame.unify(&pattern, &ground), fresh.unify(&pattern, &ground));
    }
}
