use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::types::TypeId;

/// A Term is a node of a parse tree: a head atom applied to an ordered list of arguments.
/// A term with no args is a plain atom.
/// Terms are immutable once built and compare structurally. There is no alpha-renaming,
/// variables are concrete named entities.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// The typecode of the whole term.
    /// For a variable leaf, this is the declared type of the variable.
    term_type: TypeId,

    head: Atom,
    args: Vec<Term>,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Term {
    pub fn new(term_type: TypeId, head: Atom, args: Vec<Term>) -> Term {
        Term {
            term_type,
            head,
            args,
        }
    }

    pub fn new_variable(term_type: TypeId, index: AtomId) -> Term {
        Term {
            term_type,
            head: Atom::Variable(index),
            args: vec![],
        }
    }

    pub fn get_term_type(&self) -> TypeId {
        self.term_type
    }

    pub fn get_head_atom(&self) -> &Atom {
        &self.head
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn get_arg(&self, index: usize) -> &Term {
        &self.args[index]
    }

    pub fn iter_args(&self) -> impl Iterator<Item = &Term> {
        self.args.iter()
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// If this term is a bare variable, return its id.
    pub fn atomic_variable(&self) -> Option<AtomId> {
        if self.args.is_empty() {
            self.head.as_variable()
        } else {
            None
        }
    }

    pub fn is_variable(&self) -> bool {
        self.atomic_variable().is_some()
    }

    /// Iterates over all atoms in the term (head first, then recursively through arguments)
    pub fn iter_atoms(&self) -> Box<dyn Iterator<Item = &Atom> + '_> {
        Box::new(
            std::iter::once(&self.head).chain(self.args.iter().flat_map(|arg| arg.iter_atoms())),
        )
    }

    /// The atoms of the term in reverse Polish order: every argument before its head.
    /// This is the order in which a proof of the term's well-formedness refers to its symbols.
    pub fn rpn(&self) -> Vec<Atom> {
        let mut answer = vec![];
        self.push_rpn(&mut answer);
        answer
    }

    fn push_rpn(&self, output: &mut Vec<Atom>) {
        for arg in &self.args {
            arg.push_rpn(output);
        }
        output.push(self.head);
    }

    pub fn has_atom(&self, atom: &Atom) -> bool {
        self.iter_atoms().any(|a| a == atom)
    }

    /// Iterates over all variables in the term, with repetition.
    /// Returns (AtomId, TypeId) pairs for each variable leaf found.
    pub fn iter_vars(&self) -> Box<dyn Iterator<Item = (AtomId, TypeId)> + '_> {
        let head_var = self.head.as_variable().map(|id| (id, self.term_type));
        Box::new(
            head_var
                .into_iter()
                .chain(self.args.iter().flat_map(|arg| arg.iter_vars())),
        )
    }

    /// Adds the ids of all variables in this term to the set.
    pub fn collect_variables(&self, output: &mut BTreeSet<AtomId>) {
        for (id, _) in self.iter_vars() {
            output.insert(id);
        }
    }

    pub fn variables(&self) -> BTreeSet<AtomId> {
        let mut answer = BTreeSet::new();
        self.collect_variables(&mut answer);
        answer
    }

    /// Replaces variables according to the map. Unmapped variables are kept.
    pub fn replace_variables(&self, map: &HashMap<AtomId, Term>) -> Term {
        if let Some(id) = self.atomic_variable() {
            if let Some(replacement) = map.get(&id) {
                return replacement.clone();
            }
        }
        Term {
            term_type: self.term_type,
            head: self.head,
            args: self
                .args
                .iter()
                .map(|arg| arg.replace_variables(map))
                .collect(),
        }
    }

    /// The number of nodes in the term.
    pub fn size(&self) -> usize {
        1 + self.args.iter().map(|arg| arg.size()).sum::<usize>()
    }
}
