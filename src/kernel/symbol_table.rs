use std::collections::HashMap;

use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::term::Term;
use crate::kernel::types::TypeId;

/// The theory-wide insertion index. Every declaration and statement gets a distinct one.
pub type Seq = u32;

/// A declared variable, like "x" of type "set".
#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub name: String,
    pub var_type: TypeId,
    pub seq: Seq,
}

/// A syntax axiom introduces a symbol that builds terms of a given type out of arguments.
#[derive(Clone, Debug)]
pub struct SyntaxDecl {
    pub label: String,
    pub term_type: TypeId,
    pub seq: Seq,

    /// The symbol applied to its declared argument variables, like "wal(x, ph)".
    /// The argument positions of the prototype are the variable positions of the symbol.
    pub prototype: Term,
}

/// Terms only contain small integer ids. The SymbolTable maps between those ids and the
/// names and declarations they stand for.
#[derive(Clone, Default)]
pub struct SymbolTable {
    /// type_names[i] is the name of TypeId(i).
    type_names: Vec<String>,

    /// variables[i] is the declaration of Atom::Variable(i).
    variables: Vec<VariableDecl>,

    /// syntax[i] is the declaration of Atom::Symbol(i).
    syntax: Vec<SyntaxDecl>,

    /// Inverse map for types.
    name_to_type: HashMap<String, TypeId>,

    /// Inverse map for variables and symbols, which share a namespace.
    name_to_atom: HashMap<String, Atom>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn add_type(&mut self, name: &str) -> Result<TypeId, String> {
        if self.name_to_type.contains_key(name) {
            return Err(format!("type {} is declared twice", name));
        }
        let type_id = TypeId(self.type_names.len() as u16);
        self.type_names.push(name.to_string());
        self.name_to_type.insert(name.to_string(), type_id);
        Ok(type_id)
    }

    pub fn get_type(&self, name: &str) -> Option<TypeId> {
        self.name_to_type.get(name).copied()
    }

    pub fn type_name(&self, type_id: TypeId) -> &str {
        &self.type_names[type_id.get() as usize]
    }

    fn check_fresh_name(&self, name: &str) -> Result<(), String> {
        if self.name_to_atom.contains_key(name) {
            return Err(format!("{} is declared twice", name));
        }
        Ok(())
    }

    pub fn add_variable(&mut self, name: &str, var_type: TypeId, seq: Seq) -> Result<Atom, String> {
        self.check_fresh_name(name)?;
        let atom = Atom::Variable(self.variables.len() as AtomId);
        self.variables.push(VariableDecl {
            name: name.to_string(),
            var_type,
            seq,
        });
        self.name_to_atom.insert(name.to_string(), atom);
        Ok(atom)
    }

    /// Declares a symbol whose arguments have the types of the given variables.
    /// The arguments must be distinct variables.
    pub fn add_syntax(
        &mut self,
        label: &str,
        term_type: TypeId,
        args: &[AtomId],
        seq: Seq,
    ) -> Result<Atom, String> {
        self.check_fresh_name(label)?;
        for (i, id) in args.iter().enumerate() {
            if args[..i].contains(id) {
                return Err(format!(
                    "syntax axiom {} repeats the argument {}",
                    label,
                    self.variable(*id).name
                ));
            }
        }
        let atom = Atom::Symbol(self.syntax.len() as AtomId);
        let prototype = Term::new(
            term_type,
            atom,
            args.iter()
                .map(|&id| Term::new_variable(self.var_type(id), id))
                .collect(),
        );
        self.syntax.push(SyntaxDecl {
            label: label.to_string(),
            term_type,
            seq,
            prototype,
        });
        self.name_to_atom.insert(label.to_string(), atom);
        Ok(atom)
    }

    pub fn get_atom(&self, name: &str) -> Option<Atom> {
        self.name_to_atom.get(name).copied()
    }

    /// Looks up a symbol by its label, ignoring variables.
    pub fn get_symbol(&self, label: &str) -> Option<AtomId> {
        self.get_atom(label).and_then(|atom| atom.as_symbol())
    }

    pub fn variable(&self, id: AtomId) -> &VariableDecl {
        &self.variables[id as usize]
    }

    pub fn var_type(&self, id: AtomId) -> TypeId {
        self.variable(id).var_type
    }

    pub fn var_name(&self, id: AtomId) -> &str {
        &self.variable(id).name
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn syntax(&self, id: AtomId) -> &SyntaxDecl {
        &self.syntax[id as usize]
    }

    pub fn num_symbols(&self) -> usize {
        self.syntax.len()
    }

    pub fn atom_str(&self, atom: &Atom) -> &str {
        match atom {
            Atom::Variable(i) => &self.variable(*i).name,
            Atom::Symbol(i) => &self.syntax(*i).label,
        }
    }

    pub fn atom_seq(&self, atom: &Atom) -> Seq {
        match atom {
            Atom::Variable(i) => self.variable(*i).seq,
            Atom::Symbol(i) => self.syntax(*i).seq,
        }
    }

    /// Iterates over variable ids in declaration order.
    pub fn iter_variables(&self) -> impl Iterator<Item = (AtomId, &VariableDecl)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, decl)| (i as AtomId, decl))
    }
}
