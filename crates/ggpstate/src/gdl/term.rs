//! Logic terms
//!
//! Terms are tree-shaped values with structural equality: variables, interned
//! atoms, integers, and compounds. GDL lists are `'.'(Head, Tail)` chains
//! terminated by `'[]'`.

use super::symbols::{AtomId, SymbolTable, WellKnown};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A variable, identified by its slot within a binding frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub u32);

impl Var {
    /// The frame slot this variable occupies
    pub fn ord(self) -> usize {
        self.0 as usize
    }
}

impl Serialize for Var {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Var {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Var)
    }
}

/// A predicate identifier: functor name plus arity
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pred {
    pub name: AtomId,
    pub arity: usize,
}

impl Pred {
    pub fn new(name: AtomId, arity: usize) -> Self {
        Pred { name, arity }
    }
}

/// A term in a game description
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Var(Var),
    Atom(AtomId),
    Int(i64),
    Compound(AtomId, Vec<Term>),
}

impl Term {
    /// Create a variable term
    pub fn var(ord: u32) -> Self {
        Term::Var(Var(ord))
    }

    /// Create a compound term; a zero-argument compound collapses to an atom
    pub fn compound(functor: AtomId, args: Vec<Term>) -> Self {
        if args.is_empty() {
            Term::Atom(functor)
        } else {
            Term::Compound(functor, args)
        }
    }

    /// Build a proper list term from items
    pub fn list<I>(items: I, well: &WellKnown) -> Self
    where
        I: IntoIterator<Item = Term>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut list = Term::Atom(well.nil);
        for item in items.into_iter().rev() {
            list = Term::Compound(well.cons, vec![item, list]);
        }
        list
    }

    /// The functor/arity of this term, if it has one
    pub fn functor(&self) -> Option<Pred> {
        match self {
            Term::Atom(name) => Some(Pred::new(*name, 0)),
            Term::Compound(name, args) => Some(Pred::new(*name, args.len())),
            Term::Var(_) | Term::Int(_) => None,
        }
    }

    /// Check that this term contains no variables
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Atom(_) | Term::Int(_) => true,
            Term::Compound(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Largest variable ordinal occurring in this term
    pub fn max_var(&self) -> Option<u32> {
        match self {
            Term::Var(v) => Some(v.0),
            Term::Atom(_) | Term::Int(_) => None,
            Term::Compound(_, args) => args.iter().filter_map(Term::max_var).max(),
        }
    }

    /// Copy of this term with every variable ordinal shifted by `offset`.
    /// Used when instantiating a compiled clause into a live frame.
    pub fn shift_vars(&self, offset: u32) -> Term {
        match self {
            Term::Var(v) => Term::Var(Var(v.0 + offset)),
            Term::Atom(_) | Term::Int(_) => self.clone(),
            Term::Compound(f, args) => {
                Term::Compound(*f, args.iter().map(|a| a.shift_vars(offset)).collect())
            }
        }
    }

    /// Whether any subterm (at any depth) has a functor in `preds`
    pub fn mentions_any(&self, preds: &std::collections::HashSet<Pred>) -> bool {
        match self {
            Term::Var(_) | Term::Int(_) => false,
            Term::Atom(_) => self.functor().is_some_and(|p| preds.contains(&p)),
            Term::Compound(_, args) => {
                self.functor().is_some_and(|p| preds.contains(&p))
                    || args.iter().any(|a| a.mentions_any(preds))
            }
        }
    }

    /// Iterate over the items of a proper list term.
    /// Returns None if this term is not a nil-terminated cons chain.
    pub fn list_items(&self, well: &WellKnown) -> Option<Vec<&Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Term::Atom(a) if *a == well.nil => return Some(items),
                Term::Compound(f, args) if *f == well.cons && args.len() == 2 => {
                    items.push(&args[0]);
                    cursor = &args[1];
                }
                _ => return None,
            }
        }
    }

    /// Format this term with a symbol table for name resolution
    pub fn display<'a>(&'a self, symbols: &'a SymbolTable) -> TermDisplay<'a> {
        TermDisplay { term: self, symbols }
    }
}

impl From<Var> for Term {
    fn from(v: Var) -> Self {
        Term::Var(v)
    }
}

/// Display wrapper resolving atom names through a symbol table
pub struct TermDisplay<'a> {
    term: &'a Term,
    symbols: &'a SymbolTable,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let well = self.symbols.well_known();
        match self.term {
            Term::Var(v) => write!(f, "?{}", v.0),
            Term::Atom(a) => write!(f, "{}", self.symbols.resolve(*a)),
            Term::Int(n) => write!(f, "{}", n),
            Term::Compound(functor, args) => {
                if let Some(items) = self.term.list_items(well) {
                    write!(f, "[")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", item.display(self.symbols))?;
                    }
                    return write!(f, "]");
                }
                write!(f, "{}(", self.symbols.resolve(*functor))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg.display(self.symbols))?;
                }
                write!(f, ")")
            }
        }
    }
}
