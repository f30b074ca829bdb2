//! State transitions: initial state, legality-checked successors, and
//! truth histories with cache reuse
//!
//! A successor is derived by proving `next(F)` against the previous truth
//! state and the joint move, after every move has passed its `legal/2`
//! check. Truth histories walk the move history oldest-first; a cached
//! entry is reused only while its position and move vector both agree with
//! the requested history — the first mismatch invalidates everything after
//! it and derivation resumes from there.

use super::profile::TransitionProfile;
use crate::db::GameRecord;
use crate::error::{EngineError, Result};
use crate::gdl::state::{HistoryEntry, MoveVector, TruthHistory, TruthState};
use crate::gdl::symbols::WellKnown;
use crate::gdl::term::Term;
use crate::solve::Answers;

/// Derive the initial truth state: every `f` with `init(f)` provable
pub(crate) fn initial_truth_state(
    record: &GameRecord,
    well: &WellKnown,
    profile: Option<&TransitionProfile>,
) -> Result<TruthState> {
    if let Some(profile) = profile {
        profile.count_initial_state();
    }
    let nil = Term::Atom(well.nil);
    let query = Term::Compound(well.init, vec![Term::var(0)]);
    let goal = record.stateifier(well).rewrite_query(&query, &nil, &nil);
    let facts = Answers::new(record, *well, goal).collect_instances(&Term::var(0))?;
    Ok(facts.into_iter().collect())
}

/// Prove `legal(R, A)` for every move of a prepared vector.
///
/// The vector must carry exactly one ground `does/2` per role; the first
/// unprovable move aborts with `IllegalMove`.
pub(crate) fn check_legal(
    record: &GameRecord,
    well: &WellKnown,
    profile: Option<&TransitionProfile>,
    truth: &TruthState,
    moves: &MoveVector,
) -> Result<()> {
    if moves.len() != record.roles().len() {
        return Err(EngineError::RoleMismatch {
            expected: record.roles().to_vec(),
            provided: moves.moves().to_vec(),
        });
    }
    let truth_term = truth.to_list_term(well);
    let moves_term = moves.to_list_term(well);
    let stateifier = record.stateifier(well);

    for m in moves.iter() {
        let (role, action) = match m {
            Term::Compound(f, args) if *f == well.does && args.len() == 2 => {
                (args[0].clone(), args[1].clone())
            }
            other => {
                return Err(EngineError::RoleMismatch {
                    expected: record.roles().to_vec(),
                    provided: vec![other.clone()],
                })
            }
        };
        if let Some(profile) = profile {
            profile.count_legality_check();
        }
        let query = Term::Compound(well.legal, vec![role.clone(), action.clone()]);
        let goal = stateifier.rewrite_query(&query, &truth_term, &moves_term);
        if !Answers::new(record, *well, goal).any()? {
            log::debug!("illegal move rejected: {:?} does {:?}", role, action);
            return Err(EngineError::IllegalMove { role, action });
        }
    }
    Ok(())
}

/// Derive the next truth state from `(truth, moves)`
pub(crate) fn successor(
    record: &GameRecord,
    well: &WellKnown,
    profile: Option<&TransitionProfile>,
    truth: &TruthState,
    moves: &MoveVector,
) -> Result<TruthState> {
    check_legal(record, well, profile, truth, moves)?;
    if let Some(profile) = profile {
        profile.count_successor();
    }
    let truth_term = truth.to_list_term(well);
    let moves_term = moves.to_list_term(well);
    let query = Term::Compound(well.next, vec![Term::var(0)]);
    let goal = record
        .stateifier(well)
        .rewrite_query(&query, &truth_term, &moves_term);
    let facts = Answers::new(record, *well, goal).collect_instances(&Term::var(0))?;
    Ok(facts.into_iter().collect())
}

/// Build the truth history for a move history, reusing a cached prefix.
///
/// Reuse is positional: walking both histories from the oldest end, a cached
/// entry is taken iff its move vector equals the requested one at the same
/// position and every earlier entry was also reused. A differing move is
/// never trusted — everything from there on is rederived.
pub(crate) fn truth_history(
    record: &GameRecord,
    well: &WellKnown,
    profile: Option<&TransitionProfile>,
    move_history: &[MoveVector],
    cache: Option<&TruthHistory>,
) -> Result<TruthHistory> {
    let cached: Vec<&HistoryEntry> = cache
        .map(|history| history.iter_oldest_first().collect())
        .unwrap_or_default();

    let mut entries: Vec<HistoryEntry> = Vec::with_capacity(move_history.len() + 1);
    // The oldest cache entry is the start sentinel; reuse its state.
    let mut reusing = matches!(cached.first(), Some(entry) if entry.moves.is_none());
    let initial = if reusing {
        cached[0].state.clone()
    } else {
        initial_truth_state(record, well, profile)?
    };
    entries.push(HistoryEntry {
        moves: None,
        state: initial,
    });

    for (i, moves) in move_history.iter().enumerate() {
        let cached_entry = if reusing { cached.get(i + 1) } else { None };
        let state = match cached_entry {
            Some(entry)
                if entry
                    .moves
                    .as_ref()
                    .is_some_and(|m| m.moves() == moves.moves()) =>
            {
                entry.state.clone()
            }
            _ => {
                reusing = false;
                let previous = &entries[i].state;
                successor(record, well, profile, previous, moves)?
            }
        };
        entries.push(HistoryEntry {
            moves: Some(moves.clone()),
            state,
        });
    }

    entries.reverse();
    Ok(TruthHistory::from_entries_newest_first(entries))
}

/// Permute an unordered move list into canonical role order.
///
/// Fails with `RoleMismatch` unless the list covers each game role exactly
/// once with ground `does/2` terms.
pub(crate) fn prepare_moves(
    record: &GameRecord,
    well: &WellKnown,
    moves: &[Term],
) -> Result<MoveVector> {
    let roles = record.roles();
    let mismatch = || EngineError::RoleMismatch {
        expected: roles.to_vec(),
        provided: moves.to_vec(),
    };

    if moves.len() != roles.len() {
        return Err(mismatch());
    }

    let mut remaining: Vec<Option<&Term>> = moves.iter().map(Some).collect();
    let mut prepared = Vec::with_capacity(roles.len());
    for role in roles {
        let position = remaining.iter().position(|slot| {
            slot.is_some_and(|m| match m {
                Term::Compound(f, args) if *f == well.does && args.len() == 2 => {
                    args[0] == *role && m.is_ground()
                }
                _ => false,
            })
        });
        match position {
            Some(index) => {
                prepared.push(remaining[index].take().expect("slot occupied").clone());
            }
            None => return Err(mismatch()),
        }
    }
    Ok(MoveVector::new(prepared))
}
