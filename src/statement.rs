use std::collections::BTreeSet;

use crate::kernel::atom::AtomId;
use crate::kernel::symbol_table::Seq;
use crate::kernel::term::Term;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatementKind {
    /// Accepted without proof. Definitions are axioms of this kind.
    Axiom,

    /// Proved elsewhere. The checker trusts its statement and never looks at a proof.
    Theorem,
}

/// An unordered pair of variables that are required to be distinct.
/// Normalized so that lo < hi in the canonical variable order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DisjointPair {
    pub lo: AtomId,
    pub hi: AtomId,
}

impl DisjointPair {
    /// Returns None for a variable paired with itself, which can never be satisfied.
    pub fn new(a: AtomId, b: AtomId) -> Option<DisjointPair> {
        if a == b {
            None
        } else {
            Some(DisjointPair {
                lo: a.min(b),
                hi: a.max(b),
            })
        }
    }
}

/// The disjoint variable constraints of a statement.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    pairs: BTreeSet<DisjointPair>,
}

impl Frame {
    pub fn new() -> Frame {
        Frame::default()
    }

    /// A group like "$d x y z" makes every pair of its members distinct.
    pub fn add_group(&mut self, group: &[AtomId]) {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                if let Some(pair) = DisjointPair::new(a, b) {
                    self.pairs.insert(pair);
                }
            }
        }
    }

    pub fn from_groups(groups: &[Vec<AtomId>]) -> Frame {
        let mut frame = Frame::new();
        for group in groups {
            frame.add_group(group);
        }
        frame
    }

    pub fn are_distinct(&self, a: AtomId, b: AtomId) -> bool {
        match DisjointPair::new(a, b) {
            Some(pair) => self.pairs.contains(&pair),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisjointPair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// An assertion of the theory: an axiom or a theorem, with its logical hypotheses.
/// Statements are never modified after they are added to a Theory.
#[derive(Clone, Debug)]
pub struct Statement {
    pub label: String,
    pub seq: Seq,
    pub kind: StatementKind,
    pub hypotheses: Vec<Term>,
    pub expr: Term,
    pub frame: Frame,
}

impl Statement {
    pub fn is_axiom(&self) -> bool {
        self.kind == StatementKind::Axiom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_groups_are_pairwise() {
        let frame = Frame::from_groups(&[vec![3, 1, 2], vec![5, 4]]);
        assert_eq!(frame.len(), 4);
        assert!(frame.are_distinct(1, 3));
        assert!(frame.are_distinct(3, 1));
        assert!(frame.are_distinct(2, 3));
        assert!(frame.are_distinct(4, 5));
        assert!(!frame.are_distinct(1, 4));
        assert!(!frame.are_distinct(2, 2));
    }

    #[test]
    fn test_disjoint_pair_normalizes() {
        assert_eq!(DisjointPair::new(7, 2), Some(DisjointPair { lo: 2, hi: 7 }));
        assert_eq!(DisjointPair::new(2, 2), None);
    }
}
