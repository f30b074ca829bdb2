//! Symbol interning for game vocabularies
//!
//! Atoms are interned into `u32` ids so that terms compare and hash in O(1)
//! and clone without touching the heap. The table is an explicit value owned
//! by the engine; there is no global state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// ID for an interned atom name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub(crate) u32);

impl AtomId {
    /// Get the raw ID value (for debugging/serialization)
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

// Serialized as a bare u32 for compact storage; name resolution goes through
// the owning SymbolTable.

impl Serialize for AtomId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AtomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(AtomId)
    }
}

/// The fixed GDL vocabulary, interned once at table construction.
///
/// Holding these as fields lets the analyser, rewriter, and solver branch on
/// ids instead of string-matching functor names on every call.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub true_: AtomId,
    pub does: AtomId,
    pub init: AtomId,
    pub next: AtomId,
    pub legal: AtomId,
    pub role: AtomId,
    pub goal: AtomId,
    pub terminal: AtomId,
    pub base: AtomId,
    pub input: AtomId,
    pub distinct: AtomId,
    pub or: AtomId,
    pub not: AtomId,
    pub and: AtomId,
    pub semicolon: AtomId,
    pub member: AtomId,
    pub findall: AtomId,
    pub setof: AtomId,
    pub bagof: AtomId,
    pub succ: AtomId,
    pub state: AtomId,
    pub state_dynamic: AtomId,
    pub implies: AtomId,
    pub cons: AtomId,
    pub nil: AtomId,
    pub start: AtomId,
}

/// Interner mapping atom names to ids and back
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<String>,
    lookup: HashMap<String, u32>,
    well: WellKnown,
}

impl SymbolTable {
    /// Create a table with the GDL vocabulary pre-interned
    pub fn new() -> Self {
        let mut names = Vec::new();
        let mut lookup = HashMap::new();
        let mut intern = |name: &str| {
            let id = names.len() as u32;
            names.push(name.to_string());
            lookup.insert(name.to_string(), id);
            AtomId(id)
        };
        let well = WellKnown {
            true_: intern("true"),
            does: intern("does"),
            init: intern("init"),
            next: intern("next"),
            legal: intern("legal"),
            role: intern("role"),
            goal: intern("goal"),
            terminal: intern("terminal"),
            base: intern("base"),
            input: intern("input"),
            distinct: intern("distinct"),
            or: intern("or"),
            not: intern("not"),
            and: intern(","),
            semicolon: intern(";"),
            member: intern("member"),
            findall: intern("findall"),
            setof: intern("setof"),
            bagof: intern("bagof"),
            succ: intern("succ"),
            state: intern("state"),
            state_dynamic: intern("state_dynamic"),
            implies: intern(":-"),
            cons: intern("."),
            nil: intern("[]"),
            start: intern("start"),
        };
        SymbolTable {
            names,
            lookup,
            well,
        }
    }

    /// Intern an atom name, returning its id (get-or-create)
    pub fn intern(&mut self, name: &str) -> AtomId {
        if let Some(&id) = self.lookup.get(name) {
            return AtomId(id);
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        AtomId(id)
    }

    /// Resolve an id to its name
    pub fn resolve(&self, id: AtomId) -> &str {
        &self.names[id.0 as usize]
    }

    /// Get the id for an already-interned name (returns None if not found)
    pub fn get(&self, name: &str) -> Option<AtomId> {
        self.lookup.get(name).copied().map(AtomId)
    }

    /// The pre-interned GDL vocabulary
    pub fn well_known(&self) -> &WellKnown {
        &self.well
    }

    /// Number of interned atoms
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
