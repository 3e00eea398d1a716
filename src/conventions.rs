use serde::{Deserialize, Serialize};

use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::symbol_table::SymbolTable;
use crate::kernel::term::Term;
use crate::kernel::types::TypeId;

/// The names of the syntax and types the definition check relies on.
/// The defaults are the names used by set.mm.
///
/// Argument order is fixed:
///   implication(antecedent, consequent)
///   forall(variable, body)
///   set_to_class(variable)
///   membership(element, class)
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// A definition must be rooted at one of these.
    pub equalities: Vec<String>,

    pub implication: String,
    pub forall: String,
    pub set_to_class: String,
    pub membership: String,

    /// Dummy variables must have this type, unless a justification theorem is found.
    pub set_type: String,
    pub class_type: String,
    pub wff_type: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            equalities: vec!["wceq".to_string(), "wb".to_string()],
            implication: "wi".to_string(),
            forall: "wal".to_string(),
            set_to_class: "cv".to_string(),
            membership: "wcel".to_string(),
            set_type: "set".to_string(),
            class_type: "class".to_string(),
            wff_type: "wff".to_string(),
        }
    }
}

/// A symbol together with the type of the terms it builds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Connective {
    pub symbol: AtomId,
    pub term_type: TypeId,
}

impl Connective {
    fn resolve(table: &SymbolTable, label: &str) -> Option<Connective> {
        let symbol = table.get_symbol(label)?;
        Some(Connective {
            symbol,
            term_type: table.syntax(symbol).term_type,
        })
    }

    pub fn atom(&self) -> Atom {
        Atom::Symbol(self.symbol)
    }

    pub fn apply(&self, args: Vec<Term>) -> Term {
        Term::new(self.term_type, self.atom(), args)
    }
}

/// Conventions resolved against the symbol table of a theory.
/// Anything the theory does not declare is None, and the checks that need it
/// degrade to "not proved".
#[derive(Clone, Debug, Default)]
pub struct Connectives {
    pub equalities: Vec<AtomId>,
    pub implication: Option<Connective>,
    pub forall: Option<Connective>,
    pub set_to_class: Option<Connective>,
    pub membership: Option<Connective>,
    pub set_type: Option<TypeId>,
    pub class_type: Option<TypeId>,
    pub wff_type: Option<TypeId>,
}

impl Connectives {
    pub fn resolve(conventions: &Conventions, table: &SymbolTable) -> Connectives {
        Connectives {
            equalities: conventions
                .equalities
                .iter()
                .filter_map(|label| table.get_symbol(label))
                .collect(),
            implication: Connective::resolve(table, &conventions.implication),
            forall: Connective::resolve(table, &conventions.forall),
            set_to_class: Connective::resolve(table, &conventions.set_to_class),
            membership: Connective::resolve(table, &conventions.membership),
            set_type: table.get_type(&conventions.set_type),
            class_type: table.get_type(&conventions.class_type),
            wff_type: table.get_type(&conventions.wff_type),
        }
    }

    pub fn is_equality(&self, atom: &Atom) -> bool {
        match atom {
            Atom::Symbol(id) => self.equalities.contains(id),
            Atom::Variable(_) => false,
        }
    }

    pub fn is_set_type(&self, type_id: TypeId) -> bool {
        self.set_type == Some(type_id)
    }

    /// Wraps a term until it has the goal type.
    /// A set variable x becomes the class cv(x), and a class A becomes the wff
    /// membership(dummy, A). Returns None if the goal type can't be reached that way.
    pub fn box_to_type(&self, node: &Term, dummy: Option<&Term>, goal: TypeId) -> Option<Term> {
        let mut current = node.clone();
        if current.get_term_type() == goal {
            return Some(current);
        }
        if self.set_type == Some(current.get_term_type()) {
            current = self.set_to_class?.apply(vec![current]);
            if current.get_term_type() == goal {
                return Some(current);
            }
        }
        if self.class_type == Some(current.get_term_type()) {
            current = self.membership?.apply(vec![dummy?.clone(), current]);
        }
        if current.get_term_type() == goal {
            Some(current)
        } else {
            None
        }
    }

    /// Builds implication(antecedent, consequent).
    pub fn implies(&self, antecedent: Term, consequent: Term) -> Option<Term> {
        Some(self.implication?.apply(vec![antecedent, consequent]))
    }

    /// Builds forall(var, body).
    pub fn for_all(&self, var: Term, body: Term) -> Option<Term> {
        Some(self.forall?.apply(vec![var, body]))
    }

    /// Builds "body implies forall var, body", which holds when var is not free in body.
    /// Class-typed bodies are boxed into wffs with the dummy.
    pub fn not_free_goal(&self, var: &Term, body: &Term, dummy: Option<&Term>) -> Option<Term> {
        let expr = self.box_to_type(body, dummy, self.wff_type?)?;
        let quantified = self.for_all(var.clone(), expr.clone())?;
        self.implies(expr, quantified)
    }
}
