//! The game state engine
//!
//! An `Engine` is a value: it owns the symbol table and a map of game id to
//! installed game record. Installation takes the engine by exclusive
//! reference and publish-replaces the record `Arc` for that id; queries take
//! it by shared reference and read a consistent snapshot. There is no global
//! state and no internal timeout — callers bound work by dropping answer
//! streams.

pub mod profile;
mod transition;

pub use profile::TransitionProfile;

use crate::config::EngineConfig;
use crate::db::GameRecord;
use crate::error::{EngineError, Result};
use crate::gdl::state::{MoveVector, TruthHistory, TruthState};
use crate::gdl::symbols::{AtomId, SymbolTable, WellKnown};
use crate::gdl::term::Term;
use crate::solve::Answers;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Largest utility any role can achieve
pub const MAX_UTILITY: i64 = 100;
/// Smallest utility any role can achieve
pub const MIN_UTILITY: i64 = 0;

/// A multi-game state engine over GDL rule-sets
#[derive(Debug)]
pub struct Engine {
    symbols: SymbolTable,
    games: HashMap<AtomId, Arc<GameRecord>>,
    profile: Option<TransitionProfile>,
}

impl Engine {
    pub fn new() -> Self {
        Engine::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            symbols: SymbolTable::new(),
            games: HashMap::new(),
            profile: config.enable_profiling.then(TransitionProfile::default),
        }
    }

    /// The engine's symbol table; terms passed to query operations must be
    /// built against it
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Derivation counters, present when profiling is enabled
    pub fn profile(&self) -> Option<&TransitionProfile> {
        self.profile.as_ref()
    }

    fn well(&self) -> WellKnown {
        *self.symbols.well_known()
    }

    /// Install a game from an already-parsed rule-set, replacing any prior
    /// game with the same id. Other games are unaffected.
    pub fn create_game(&mut self, id: &str, rules: &[Term]) -> Result<()> {
        let game_id = self.symbols.intern(id);
        let well = self.well();
        let mut record = GameRecord::install(game_id, rules, &well)?;

        // Canonical role order: role/1 answers in clause order, deduplicated.
        let role_query = Term::Compound(well.role, vec![Term::var(0)]);
        let roles = Answers::new(&record, well, role_query)
            .collect_instances(&Term::var(0))?
            .into_iter()
            .collect::<IndexSet<Term>>();
        for role in &roles {
            if !role.is_ground() {
                return Err(EngineError::MalformedClause {
                    clause: role.clone(),
                    reason: "role must be ground".to_string(),
                });
            }
        }
        record.set_roles(roles.into_iter().collect());

        self.games.insert(game_id, Arc::new(record));
        Ok(())
    }

    /// Whether a game with this id has been created
    pub fn game_exists(&self, id: &str) -> bool {
        self.symbols
            .get(id)
            .is_some_and(|game_id| self.games.contains_key(&game_id))
    }

    fn record(&self, id: &str) -> Result<&GameRecord> {
        self.symbols
            .get(id)
            .and_then(|game_id| self.games.get(&game_id))
            .map(|record| record.as_ref())
            .ok_or_else(|| EngineError::UnknownGame(id.to_string()))
    }

    /// A shared snapshot of a game's record, e.g. for querying from another
    /// thread while this engine keeps installing games
    pub fn snapshot(&self, id: &str) -> Result<Arc<GameRecord>> {
        self.symbols
            .get(id)
            .and_then(|game_id| self.games.get(&game_id))
            .cloned()
            .ok_or_else(|| EngineError::UnknownGame(id.to_string()))
    }

    /// The game's roles in canonical order
    pub fn roles(&self, id: &str) -> Result<&[Term]> {
        Ok(self.record(id)?.roles())
    }

    /// Resolve a query against an explicit truth state and optional move
    /// vector, streaming answers lazily in Prolog order
    pub fn game_state<'e>(
        &'e self,
        id: &str,
        truth: &TruthState,
        moves: Option<&MoveVector>,
        query: &Term,
    ) -> Result<Answers<'e>> {
        let record = self.record(id)?;
        let well = self.well();
        let truth_term = truth.to_list_term(&well);
        let moves_term = moves.map_or(Term::Atom(well.nil), |m| m.to_list_term(&well));
        let goal = record
            .stateifier(&well)
            .rewrite_query(query, &truth_term, &moves_term);
        Ok(Answers::new(record, well, goal))
    }

    /// The truth history for a move history (oldest move first), optionally
    /// reusing a previously computed history as a positional cache
    pub fn truth_history(
        &self,
        id: &str,
        move_history: &[MoveVector],
        cache: Option<&TruthHistory>,
    ) -> Result<TruthHistory> {
        let record = self.record(id)?;
        let well = self.well();
        transition::truth_history(record, &well, self.profile(), move_history, cache)
    }

    /// The truth state after applying a move history to the initial state
    pub fn game_truth_state(&self, id: &str, move_history: &[MoveVector]) -> Result<TruthState> {
        let history = self.truth_history(id, move_history, None)?;
        Ok(history.final_truth_state().clone())
    }

    /// Permute an unordered move list into canonical role order
    pub fn prepare_moves(&self, id: &str, moves: &[Term]) -> Result<MoveVector> {
        let record = self.record(id)?;
        let well = self.well();
        transition::prepare_moves(record, &well, moves)
    }

    /// Check that every move of a prepared vector is legal in `truth`
    pub fn legal_prepared_moves(
        &self,
        id: &str,
        truth: &TruthState,
        moves: &MoveVector,
    ) -> Result<()> {
        let record = self.record(id)?;
        let well = self.well();
        transition::check_legal(record, &well, self.profile(), truth, moves)
    }

    /// Resolve a query against the state reached by a move history
    pub fn move_history_game_state<'e>(
        &'e self,
        id: &str,
        move_history: &[MoveVector],
        query: &Term,
    ) -> Result<Answers<'e>> {
        let truth = self.game_truth_state(id, move_history)?;
        self.game_state(id, &truth, None, query)
    }

    /// Legal actions for a role, deduplicated in derivation order
    pub fn legal_moves(&self, id: &str, truth: &TruthState, role: &Term) -> Result<Vec<Term>> {
        let well = self.well();
        let query = Term::Compound(well.legal, vec![role.clone(), Term::var(0)]);
        let actions = self
            .game_state(id, truth, None, &query)?
            .collect_instances(&Term::var(0))?;
        Ok(actions.into_iter().collect::<IndexSet<_>>().into_iter().collect())
    }

    /// Whether `terminal` holds in `truth`
    pub fn is_terminal(&self, id: &str, truth: &TruthState) -> Result<bool> {
        let well = self.well();
        let query = Term::Atom(well.terminal);
        self.game_state(id, truth, None, &query)?.any()
    }

    /// The goal utility of `role` in `truth`: the first provable
    /// `goal(Role, U)` with an integer `U`, or `None` when no goal value is
    /// derivable for this position
    pub fn utility(&self, id: &str, truth: &TruthState, role: &Term) -> Result<Option<i64>> {
        let well = self.well();
        let query = Term::Compound(well.goal, vec![role.clone(), Term::var(0)]);
        let values = self
            .game_state(id, truth, None, &query)?
            .collect_instances(&Term::var(0))?;
        Ok(values.into_iter().find_map(|value| match value {
            Term::Int(n) => Some(n),
            _ => None,
        }))
    }

    /// Every action available to `role` at some point in the game, from the
    /// stateless `input/2` relation
    pub fn all_actions(&self, id: &str, role: &Term) -> Result<Vec<Term>> {
        let record = self.record(id)?;
        let well = self.well();
        let query = Term::Compound(well.input, vec![role.clone(), Term::var(0)]);
        let goal = record.stateifier(&well).rewrite_query(
            &query,
            &Term::Atom(well.nil),
            &Term::Atom(well.nil),
        );
        let actions = Answers::new(record, well, goal).collect_instances(&Term::var(0))?;
        Ok(actions.into_iter().collect::<IndexSet<_>>().into_iter().collect())
    }

    /// The game's base propositions, from the stateless `base/1` relation
    pub fn base_propositions(&self, id: &str) -> Result<Vec<Term>> {
        let record = self.record(id)?;
        let well = self.well();
        let query = Term::Compound(well.base, vec![Term::var(0)]);
        let goal = record.stateifier(&well).rewrite_query(
            &query,
            &Term::Atom(well.nil),
            &Term::Atom(well.nil),
        );
        let propositions = Answers::new(record, well, goal).collect_instances(&Term::var(0))?;
        Ok(propositions
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
