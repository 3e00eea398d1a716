use std::fmt;

use serde::{Deserialize, Serialize};

pub type AtomId = u32;

/// An atomic value does not have any internal structure.
/// Every node of a Term is headed by an Atom.
/// The ids index into the declaration tables of the SymbolTable.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Atom {
    // A declared variable. Variable ids are handed out in declaration order,
    // so comparing ids gives the canonical variable order.
    Variable(AtomId),

    // A symbol introduced by a syntax axiom, like a connective or a class builder.
    Symbol(AtomId),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Atom::Variable(i) => write!(f, "v{}", i),
            Atom::Symbol(i) => write!(f, "s{}", i),
        }
    }
}

impl Atom {
    pub fn new(s: &str) -> Atom {
        match Atom::parse(s) {
            Some(atom) => atom,
            None => panic!("failed to parse atom: '{}'", s),
        }
    }

    /// Parses the debug representation produced by Display.
    pub fn parse(s: &str) -> Option<Atom> {
        let mut chars = s.trim().chars();
        let first = chars.next()?;
        let rest = chars.as_str();
        match first {
            'v' => Some(Atom::Variable(rest.parse().ok()?)),
            's' => Some(Atom::Symbol(rest.parse().ok()?)),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Atom::Variable(_))
    }

    pub fn as_variable(&self) -> Option<AtomId> {
        match self {
            Atom::Variable(i) => Some(*i),
            Atom::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<AtomId> {
        match self {
            Atom::Symbol(i) => Some(*i),
            Atom::Variable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_ordering() {
        assert!(Atom::Variable(0) < Atom::Variable(1));
        assert!(Atom::Variable(7) < Atom::Symbol(0));
    }

    #[test]
    fn test_atom_parse() {
        assert_eq!(Atom::new("v3"), Atom::Variable(3));
        assert_eq!(Atom::new(" s12 "), Atom::Symbol(12));
        assert_eq!(Atom::parse("x1"), None);
        assert_eq!(Atom::parse("s"), None);
    }

    #[test]
    fn test_atom_size() {
        // Atoms are stored in every term node.
        assert_eq!(std::mem::size_of::<Atom>(), 8);
    }
}
