use std::collections::BTreeSet;
use std::fmt;

use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::term::Term;

// A VariableMap maintains a mapping from variables to terms, allowing us to turn a more general term
// into a more specific one by substituting variables.
// The general side is an assertion of the theory; the special side is a goal.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct VariableMap {
    map: Vec<Option<Term>>,
}

impl VariableMap {
    pub fn new() -> VariableMap {
        VariableMap { map: Vec::new() }
    }

    pub fn get_mapping(&self, i: AtomId) -> Option<&Term> {
        let i = i as usize;
        if i >= self.map.len() {
            None
        } else {
            self.map[i].as_ref()
        }
    }

    pub fn has_mapping(&self, i: AtomId) -> bool {
        self.get_mapping(i).is_some()
    }

    pub fn set(&mut self, i: AtomId, term: Term) {
        let i = i as usize;
        if i >= self.map.len() {
            self.map.resize(i + 1, None);
        }
        self.map[i] = Some(term);
    }

    pub fn match_var(&mut self, var_id: AtomId, special_term: &Term) -> bool {
        let var_id = var_id as usize;
        if var_id >= self.map.len() {
            self.map.resize(var_id + 1, None);
        }
        match &self.map[var_id] {
            None => {
                self.map[var_id] = Some(special_term.clone());
                true
            }
            Some(general_term) => general_term == special_term,
        }
    }

    /// Extends the map so that specializing `general` yields `special`.
    /// Returns false if that is impossible. On failure the map may be partially extended,
    /// so callers should match against a clone if they need to backtrack.
    pub fn match_terms(&mut self, general: &Term, special: &Term) -> bool {
        if general.get_term_type() != special.get_term_type() {
            return false;
        }

        // Handle the case where a general variable is being mapped to the whole term
        if let Some(i) = general.atomic_variable() {
            return self.match_var(i, special);
        }

        if general.get_head_atom() != special.get_head_atom() {
            return false;
        }
        if general.num_args() != special.num_args() {
            return false;
        }
        for (g, s) in general.iter_args().zip(special.iter_args()) {
            if !self.match_terms(g, s) {
                return false;
            }
        }
        true
    }

    /// Substitutes every variable of the term.
    /// Returns None if the term contains a variable with no mapping.
    pub fn specialize(&self, term: &Term) -> Option<Term> {
        if let Some(i) = term.atomic_variable() {
            return self.get_mapping(i).cloned();
        }
        let mut args = Vec::with_capacity(term.num_args());
        for arg in term.iter_args() {
            args.push(self.specialize(arg)?);
        }
        Some(Term::new(term.get_term_type(), *term.get_head_atom(), args))
    }

    /// The variables occurring in the image of the given variable.
    /// Unmapped variables have no image, so this is empty for them.
    pub fn image_variables(&self, i: AtomId) -> BTreeSet<AtomId> {
        match self.get_mapping(i) {
            Some(term) => term.variables(),
            None => BTreeSet::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Term)> {
        self.map
            .iter()
            .enumerate()
            .filter_map(|(i, opt)| opt.as_ref().map(|term| (i, term)))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.iter().all(|opt| opt.is_none())
    }
}

impl fmt::Display for VariableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut first = true;
        for (i, term) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", Atom::Variable(i as AtomId), term)?;
            first = false;
        }
        write!(f, ")")
    }
}
