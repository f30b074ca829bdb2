//! Shared harness for game scenario tests: a term builder over an engine's
//! symbol table plus thin wrappers around the engine operations.
#![allow(dead_code)]

use ggpstate::{
    Answer, Engine, EngineConfig, EngineError, MoveVector, Term, TruthHistory, TruthState,
};
use std::cell::RefCell;

pub struct Harness {
    engine: RefCell<Engine>,
}

impl Harness {
    pub fn new() -> Self {
        Harness {
            engine: RefCell::new(Engine::new()),
        }
    }

    pub fn with_profiling() -> Self {
        Harness {
            engine: RefCell::new(Engine::with_config(EngineConfig {
                enable_profiling: true,
            })),
        }
    }

    /// Direct access for tests exercising the engine surface itself
    pub fn engine(&self) -> &RefCell<Engine> {
        &self.engine
    }

    // === Term building ===

    pub fn atom(&self, name: &str) -> Term {
        Term::Atom(self.engine.borrow_mut().symbols_mut().intern(name))
    }

    pub fn app(&self, name: &str, args: Vec<Term>) -> Term {
        Term::Compound(self.engine.borrow_mut().symbols_mut().intern(name), args)
    }

    pub fn int(&self, value: i64) -> Term {
        Term::Int(value)
    }

    pub fn var(&self, ord: u32) -> Term {
        Term::var(ord)
    }

    pub fn does(&self, role: &str, action: Term) -> Term {
        self.app("does", vec![self.atom(role), action])
    }

    /// `head :- b1, b2, ...` — a bare fact when the body is empty
    pub fn rule(&self, head: Term, body: Vec<Term>) -> Term {
        let mut literals = body.into_iter().rev();
        let last = match literals.next() {
            Some(last) => last,
            None => return head,
        };
        let body = literals.fold(last, |acc, literal| self.app(",", vec![literal, acc]));
        self.app(":-", vec![head, body])
    }

    // === Engine operations ===

    pub fn create_game(&self, id: &str, rules: &[Term]) {
        self.engine
            .borrow_mut()
            .create_game(id, rules)
            .expect("game installs");
    }

    pub fn game_exists(&self, id: &str) -> bool {
        self.engine.borrow().game_exists(id)
    }

    pub fn roles(&self, id: &str) -> Vec<Term> {
        self.engine.borrow().roles(id).expect("game exists").to_vec()
    }

    pub fn initial_state(&self, id: &str) -> TruthState {
        self.game_truth_state(id, &[]).expect("initial state derives")
    }

    pub fn game_truth_state(
        &self,
        id: &str,
        moves: &[MoveVector],
    ) -> Result<TruthState, EngineError> {
        self.engine.borrow().game_truth_state(id, moves)
    }

    pub fn truth_history(
        &self,
        id: &str,
        moves: &[MoveVector],
        cache: Option<&TruthHistory>,
    ) -> Result<TruthHistory, EngineError> {
        self.engine.borrow().truth_history(id, moves, cache)
    }

    pub fn prepare_moves(&self, id: &str, moves: &[Term]) -> Result<MoveVector, EngineError> {
        self.engine.borrow().prepare_moves(id, moves)
    }

    pub fn legal_prepared_moves(
        &self,
        id: &str,
        truth: &TruthState,
        moves: &MoveVector,
    ) -> Result<(), EngineError> {
        self.engine.borrow().legal_prepared_moves(id, truth, moves)
    }

    pub fn legal_moves(&self, id: &str, truth: &TruthState, role: &str) -> Vec<Term> {
        let role = self.atom(role);
        self.engine
            .borrow()
            .legal_moves(id, truth, &role)
            .expect("legal moves derive")
    }

    pub fn is_terminal(&self, id: &str, truth: &TruthState) -> bool {
        self.engine
            .borrow()
            .is_terminal(id, truth)
            .expect("terminal check runs")
    }

    pub fn utility(&self, id: &str, truth: &TruthState, role: &str) -> Option<i64> {
        let role = self.atom(role);
        self.engine
            .borrow()
            .utility(id, truth, &role)
            .expect("utility query runs")
    }

    /// Run a query against an explicit state, collecting all answers
    pub fn query(&self, id: &str, truth: &TruthState, query: &Term) -> Vec<Answer> {
        self.engine
            .borrow()
            .game_state(id, truth, None, query)
            .expect("game exists")
            .collect::<Result<Vec<_>, _>>()
            .expect("query runs")
    }

    /// Successor derivations so far (requires a profiling harness)
    pub fn successor_count(&self) -> usize {
        self.engine
            .borrow()
            .profile()
            .map_or(0, |profile| profile.successors())
    }
}
