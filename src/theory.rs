use std::collections::{BTreeSet, HashMap};
use std::{fmt, io};

use crate::conventions::{Connectives, Conventions};
use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::display::DisplayTerm;
use crate::kernel::symbol_table::{Seq, SymbolTable};
use crate::kernel::term::Term;
use crate::kernel::types::TypeId;
use crate::statement::{Frame, Statement, StatementKind};

// Errors building or loading a theory.
#[derive(Debug)]
pub struct TheoryError(pub String);

impl From<io::Error> for TheoryError {
    fn from(error: io::Error) -> Self {
        TheoryError(format!("{}", error))
    }
}

impl From<serde_json::Error> for TheoryError {
    fn from(error: serde_json::Error) -> Self {
        TheoryError(format!("{}", error))
    }
}

impl From<String> for TheoryError {
    fn from(message: String) -> Self {
        TheoryError(message)
    }
}

impl fmt::Display for TheoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TheoryError {}

impl From<TheoryError> for String {
    fn from(error: TheoryError) -> Self {
        error.0
    }
}

/// A statement whose truth is asserted rather than proved: either a syntax axiom or an axiom.
/// These are the statements that can make use of a symbol before it is defined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AxiomRef {
    Syntax(AtomId),
    Statement(usize),
}

/// A view of an axiom-class statement, for scanning.
pub struct AxiomView<'a> {
    pub label: &'a str,
    pub seq: Seq,
    pub expr: &'a Term,
    pub reference: AxiomRef,
}

/// The Theory is the ordered, append-only registry of everything declared so far.
/// Every declaration gets a sequence number, and sequence numbers strictly increase
/// with insertion order. Nothing is ever edited or removed once added.
pub struct Theory {
    symbols: SymbolTable,

    /// Assertions in the order they were added.
    statements: Vec<Statement>,

    label_to_statement: HashMap<String, usize>,

    /// Syntax axioms and axioms in the order they were added, and thus in sequence order.
    axioms: Vec<AxiomRef>,

    /// The last sequence number handed out.
    last_seq: Seq,

    conventions: Conventions,

    /// The conventions, resolved against the current symbol table.
    connectives: Connectives,
}

impl Default for Theory {
    fn default() -> Self {
        Theory::new(Conventions::default())
    }
}

impl Theory {
    pub fn new(conventions: Conventions) -> Theory {
        Theory {
            symbols: SymbolTable::new(),
            statements: vec![],
            label_to_statement: HashMap::new(),
            axioms: vec![],
            last_seq: 0,
            conventions,
            connectives: Connectives::default(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn connectives(&self) -> &Connectives {
        &self.connectives
    }

    pub fn last_seq(&self) -> Seq {
        self.last_seq
    }

    /// Claims the next sequence number.
    /// An explicit request must be strictly larger than anything handed out already.
    /// This is what makes every reference in the theory point backwards.
    /// Seq::MAX is never handed out, so that it can stand for "after everything".
    fn claim_seq(&mut self, requested: Option<Seq>) -> Result<Seq, TheoryError> {
        let seq = match requested {
            Some(seq) => seq,
            None => self.last_seq.checked_add(1).ok_or_else(|| {
                TheoryError("ran out of sequence numbers".to_string())
            })?,
        };
        if seq == Seq::MAX {
            return Err(TheoryError("ran out of sequence numbers".to_string()));
        }
        if seq <= self.last_seq {
            return Err(TheoryError(format!(
                "sequence number {} is not larger than the previous sequence number {}",
                seq, self.last_seq
            )));
        }
        self.last_seq = seq;
        Ok(seq)
    }

    fn refresh_connectives(&mut self) {
        self.connectives = Connectives::resolve(&self.conventions, &self.symbols);
    }

    fn get_type(&self, name: &str) -> Result<TypeId, TheoryError> {
        self.symbols
            .get_type(name)
            .ok_or_else(|| TheoryError(format!("unknown type '{}'", name)))
    }

    fn check_fresh_label(&self, label: &str) -> Result<(), TheoryError> {
        if self.label_to_statement.contains_key(label) || self.symbols.get_atom(label).is_some() {
            return Err(TheoryError(format!("label {} is declared twice", label)));
        }
        Ok(())
    }

    pub fn add_type(&mut self, name: &str) -> Result<TypeId, TheoryError> {
        let type_id = self.symbols.add_type(name)?;
        self.refresh_connectives();
        Ok(type_id)
    }

    pub fn add_variable(&mut self, name: &str, type_name: &str) -> Result<AtomId, TheoryError> {
        self.add_variable_at(name, type_name, None)
    }

    pub fn add_variable_at(
        &mut self,
        name: &str,
        type_name: &str,
        seq: Option<Seq>,
    ) -> Result<AtomId, TheoryError> {
        let var_type = self.get_type(type_name)?;
        self.check_fresh_label(name)?;
        let seq = self.claim_seq(seq)?;
        let id = self.symbols.num_variables() as AtomId;
        self.symbols.add_variable(name, var_type, seq)?;
        Ok(id)
    }

    /// Declares a syntax axiom. Each argument is the name of a distinct variable,
    /// whose type becomes the type of that argument position.
    pub fn add_syntax(
        &mut self,
        label: &str,
        type_name: &str,
        args: &[&str],
    ) -> Result<AtomId, TheoryError> {
        self.add_syntax_at(label, type_name, args, None)
    }

    pub fn add_syntax_at(
        &mut self,
        label: &str,
        type_name: &str,
        args: &[&str],
        seq: Option<Seq>,
    ) -> Result<AtomId, TheoryError> {
        let term_type = self.get_type(type_name)?;
        self.check_fresh_label(label)?;
        let mut arg_ids = vec![];
        for name in args {
            match self.symbols.get_atom(name) {
                Some(Atom::Variable(id)) => arg_ids.push(id),
                _ => {
                    return Err(TheoryError(format!(
                        "argument {} of syntax axiom {} is not a variable",
                        name, label
                    )))
                }
            }
        }
        let seq = self.claim_seq(seq)?;
        let id = self.symbols.num_symbols() as AtomId;
        self.symbols.add_syntax(label, term_type, &arg_ids, seq)?;
        self.axioms.push(AxiomRef::Syntax(id));
        self.refresh_connectives();
        Ok(id)
    }

    /// Adds an assertion whose terms are already built.
    pub fn add_statement(
        &mut self,
        label: &str,
        kind: StatementKind,
        hypotheses: Vec<Term>,
        expr: Term,
        frame: Frame,
        seq: Option<Seq>,
    ) -> Result<usize, TheoryError> {
        self.check_fresh_label(label)?;
        let seq = self.claim_seq(seq)?;
        let index = self.statements.len();
        self.statements.push(Statement {
            label: label.to_string(),
            seq,
            kind,
            hypotheses,
            expr,
            frame,
        });
        self.label_to_statement.insert(label.to_string(), index);
        if kind == StatementKind::Axiom {
            self.axioms.push(AxiomRef::Statement(index));
        }
        Ok(index)
    }

    /// Adds an assertion written in prefix notation.
    /// Each disjoint group is a space-separated list of variable names, like "x y ph".
    pub fn add_assertion(
        &mut self,
        kind: StatementKind,
        label: &str,
        hypotheses: &[&str],
        expr: &str,
        disjoint: &[&str],
    ) -> Result<usize, TheoryError> {
        let hypotheses = hypotheses
            .iter()
            .map(|text| self.parse_term(text))
            .collect::<Result<Vec<_>, _>>()?;
        let expr = self.parse_term(expr)?;
        let mut groups = vec![];
        for group in disjoint {
            let names: Vec<&str> = group.split_whitespace().collect();
            groups.push(self.variable_ids(&names)?);
        }
        self.add_statement(
            label,
            kind,
            hypotheses,
            expr,
            Frame::from_groups(&groups),
            None,
        )
    }

    pub fn add_axiom(
        &mut self,
        label: &str,
        expr: &str,
        disjoint: &[&str],
    ) -> Result<usize, TheoryError> {
        self.add_assertion(StatementKind::Axiom, label, &[], expr, disjoint)
    }

    pub fn add_theorem(
        &mut self,
        label: &str,
        hypotheses: &[&str],
        expr: &str,
        disjoint: &[&str],
    ) -> Result<usize, TheoryError> {
        self.add_assertion(StatementKind::Theorem, label, hypotheses, expr, disjoint)
    }

    pub fn parse_term(&self, text: &str) -> Result<Term, TheoryError> {
        Ok(self.symbols.parse_term(text)?)
    }

    pub fn variable_ids(&self, names: &[&str]) -> Result<Vec<AtomId>, TheoryError> {
        names
            .iter()
            .map(|name| match self.symbols.get_atom(name) {
                Some(Atom::Variable(id)) => Ok(id),
                _ => Err(TheoryError(format!("{} is not a variable", name))),
            })
            .collect()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn statement(&self, index: usize) -> &Statement {
        &self.statements[index]
    }

    pub fn get_statement(&self, label: &str) -> Option<&Statement> {
        self.label_to_statement
            .get(label)
            .map(|&index| &self.statements[index])
    }

    pub fn get_statement_index(&self, label: &str) -> Option<usize> {
        self.label_to_statement.get(label).copied()
    }

    fn axiom_view(&self, reference: AxiomRef) -> AxiomView<'_> {
        match reference {
            AxiomRef::Syntax(id) => {
                let decl = self.symbols.syntax(id);
                AxiomView {
                    label: &decl.label,
                    seq: decl.seq,
                    expr: &decl.prototype,
                    reference,
                }
            }
            AxiomRef::Statement(index) => {
                let statement = &self.statements[index];
                AxiomView {
                    label: &statement.label,
                    seq: statement.seq,
                    expr: &statement.expr,
                    reference,
                }
            }
        }
    }

    /// The syntax axioms and axioms with start < seq <= end, in sequence order.
    pub fn axioms_between(&self, start: Seq, end: Seq) -> impl Iterator<Item = AxiomView<'_>> {
        let first = self
            .axioms
            .partition_point(|&r| self.axiom_view(r).seq <= start);
        self.axioms[first..]
            .iter()
            .map(move |&r| self.axiom_view(r))
            .take_while(move |view| view.seq <= end)
    }

    /// Picks the first declared variable of the given type that isn't taken yet,
    /// and marks it as taken.
    pub fn fresh_variable(&self, var_type: TypeId, taken: &mut BTreeSet<AtomId>) -> Option<AtomId> {
        let (id, _) = self
            .symbols
            .iter_variables()
            .find(|(id, decl)| decl.var_type == var_type && !taken.contains(id))?;
        taken.insert(id);
        Some(id)
    }

    /// A fresh variable as a term.
    pub fn fresh_variable_term(&self, var_type: TypeId, taken: &mut BTreeSet<AtomId>) -> Option<Term> {
        let id = self.fresh_variable(var_type, taken)?;
        Some(Term::new_variable(var_type, id))
    }

    pub fn display<'a>(&'a self, term: &'a Term) -> DisplayTerm<'a> {
        DisplayTerm::new(term, &self.symbols)
    }

    pub fn var_name(&self, id: AtomId) -> &str {
        self.symbols.var_name(id)
    }

    pub fn atom_seq(&self, atom: &Atom) -> Seq {
        self.symbols.atom_seq(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theory() -> Theory {
        let mut theory = Theory::default();
        theory.add_type("wff").unwrap();
        theory.add_type("set").unwrap();
        theory.add_variable("ph", "wff").unwrap();
        theory.add_variable("ps", "wff").unwrap();
        theory.add_variable("x", "set").unwrap();
        theory.add_variable("y", "set").unwrap();
        theory.add_syntax("wi", "wff", &["ph", "ps"]).unwrap();
        theory.add_syntax("wal", "wff", &["x", "ph"]).unwrap();
        theory
            .add_axiom("ax-1", "wi(ph, wi(ps, ph))", &[])
            .unwrap();
        theory.add_syntax("wb", "wff", &["ph", "ps"]).unwrap();
        theory
            .add_theorem("bitest", &["ph"], "wal(x, ph)", &["x y"])
            .unwrap();
        theory
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let theory = theory();
        let mut last = 0;
        for (_, decl) in theory.symbols().iter_variables() {
            assert!(decl.seq > last);
            last = decl.seq;
        }
        let wb = theory.symbols().get_atom("wb").unwrap();
        let ax1 = theory.get_statement("ax-1").unwrap();
        assert!(theory.atom_seq(&wb) > ax1.seq);
        assert!(theory.get_statement("bitest").unwrap().seq > theory.atom_seq(&wb));
        assert_eq!(theory.last_seq(), theory.get_statement("bitest").unwrap().seq);
    }

    #[test]
    fn test_explicit_sequence_numbers_must_increase() {
        let mut theory = theory();
        let last = theory.last_seq();
        assert!(theory.add_variable_at("z", "set", Some(last)).is_err());
        assert!(theory.add_variable_at("z", "set", Some(last + 10)).is_ok());
        assert!(theory
            .add_syntax_at("wn", "wff", &["ph"], Some(last + 5))
            .is_err());
        assert_eq!(theory.last_seq(), last + 10);
        assert!(theory
            .add_variable_at("w", "set", Some(Seq::MAX))
            .is_err());
    }

    #[test]
    fn test_axioms_between() {
        let theory = theory();
        let wi = theory.symbols().get_atom("wi").unwrap();
        let labels: Vec<&str> = theory
            .axioms_between(theory.atom_seq(&wi), theory.last_seq())
            .map(|view| view.label)
            .collect();
        // Theorems are not axioms.
        assert_eq!(labels, vec!["wal", "ax-1", "wb"]);

        let ax1 = theory.get_statement("ax-1").unwrap().seq;
        let labels: Vec<&str> = theory
            .axioms_between(0, ax1)
            .map(|view| view.label)
            .collect();
        assert_eq!(labels, vec!["wi", "wal", "ax-1"]);
    }

    #[test]
    fn test_fresh_variable_skips_taken() {
        let theory = theory();
        let set = theory.symbols().get_type("set").unwrap();
        let mut taken = BTreeSet::new();
        taken.insert(2);
        assert_eq!(theory.fresh_variable(set, &mut taken), Some(3));
        assert_eq!(theory.fresh_variable(set, &mut taken), None);
        assert!(taken.contains(&3));
    }

    #[test]
    fn test_rejects_bad_declarations() {
        let mut theory = theory();
        assert!(theory.add_variable("ax-1", "wff").is_err());
        assert!(theory.add_variable("z", "class").is_err());
        assert!(theory.add_syntax("wn", "wff", &["wi"]).is_err());
        assert!(theory.add_axiom("ax-1", "ph", &[]).is_err());
        assert!(theory.add_axiom("ax-2", "wi(ph)", &[]).is_err());
        assert!(theory.add_axiom("ax-3", "ph", &["x wi"]).is_err());
    }

    #[test]
    fn test_statement_frames() {
        let theory = theory();
        let statement = theory.get_statement("bitest").unwrap();
        assert_eq!(statement.kind, StatementKind::Theorem);
        assert_eq!(statement.hypotheses.len(), 1);
        assert!(statement.frame.are_distinct(2, 3));
        assert_eq!(theory.display(&statement.expr).to_string(), "wal(x, ph)");
    }
}
