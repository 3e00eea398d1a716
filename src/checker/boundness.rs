use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::checker::justification::JustificationProver;
use crate::kernel::atom::{Atom, AtomId};
use crate::kernel::term::Term;
use crate::statement::Statement;
use crate::theory::Theory;

/// For a symbol, which of its argument positions bind the set variables at other positions.
/// Only positions whose type is the set type have a row.
/// rows[i][j] is true when occurrences of the variable at position i are bound
/// inside the argument at position j.
///
/// For example, with "sum_ x e. A B" as sum(x, A, B), occurrences of x are bound in B but
/// not in A, so the table is [[true, false, true], None, None].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundnessTable {
    rows: Vec<Option<Vec<bool>>>,
}

impl BoundnessTable {
    pub fn new(rows: Vec<Option<Vec<bool>>>) -> BoundnessTable {
        BoundnessTable { rows }
    }

    pub fn arity(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, i: usize) -> Option<&[bool]> {
        self.rows.get(i)?.as_deref()
    }

    /// Whether the variable at position i is bound in the argument at position j.
    pub fn binds(&self, i: usize, j: usize) -> bool {
        match self.row(i) {
            Some(row) => row.get(j).copied().unwrap_or(false),
            None => false,
        }
    }

    /// Given which arguments are known to be bound, marks which arguments end up covered.
    /// An argument is covered if it is bound itself, or if the variable at some unbound
    /// binding position is bound within it.
    fn coverage(&self, bound: &[bool]) -> Vec<bool> {
        let mut covered = bound.to_vec();
        for (i, &is_bound) in bound.iter().enumerate() {
            if is_bound {
                continue;
            }
            if let Some(row) = self.row(i) {
                for (j, &binds) in row.iter().enumerate() {
                    if binds && j < covered.len() {
                        covered[j] = true;
                    }
                }
            }
        }
        covered
    }
}

/// How hard to try when deciding whether a variable is bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Only use the boundness tables, constructing any that are missing.
    Fast,

    /// Fall back to the prover wherever the tables don't settle it.
    /// Never constructs tables.
    Slow,
}

/// Decides whether every occurrence of a variable is bound inside a term.
/// Boundness tables are cached here for the lifetime of the oracle, which should be one run
/// over a single theory. A table only depends on its symbol, so the goals asked while
/// building one may cite anything in the theory.
#[derive(Default)]
pub struct BoundnessOracle {
    /// None means the symbol's definition has a shape we can't make a table for.
    tables: HashMap<AtomId, Option<BoundnessTable>>,

    /// Set while a table is being built from a prototype.
    building: bool,

    /// Tables constructed on demand from a syntax prototype.
    pub tables_built: u32,

    /// Tables learned from a definition that passed.
    pub tables_learned: u32,

    /// Symbols whose definition had a shape we couldn't make a table for.
    pub tables_declined: u32,

    /// Goals handed to the prover.
    pub deductive_calls: u32,
}

impl BoundnessOracle {
    pub fn new() -> BoundnessOracle {
        BoundnessOracle::default()
    }

    pub fn table(&self, symbol: AtomId) -> Option<&BoundnessTable> {
        self.tables.get(&symbol)?.as_ref()
    }

    pub fn is_declined(&self, symbol: AtomId) -> bool {
        matches!(self.tables.get(&symbol), Some(None))
    }

    pub fn num_tables(&self) -> usize {
        self.tables.values().filter(|t| t.is_some()).count()
    }

    /// Asks the prover whether var is not free in root.
    /// Class terms are turned into wffs with the placeholder.
    fn is_bound(
        &mut self,
        theory: &Theory,
        prover: &mut JustificationProver,
        var: &Term,
        placeholder: Option<&Term>,
        root: &Term,
    ) -> bool {
        let Some(goal) = theory
            .connectives()
            .not_free_goal(var, root, placeholder)
        else {
            return false;
        };
        self.deductive_calls += 1;
        if self.building {
            prover.prove_in_registry(theory, &goal)
        } else {
            prover.prove(theory, &goal)
        }
    }

    /// Whether every occurrence of var in root is bound.
    /// A false answer only means that no reason was found.
    /// The placeholder is a class term not containing var, used to turn class terms into wffs.
    pub fn prove_bound(
        &mut self,
        theory: &Theory,
        prover: &mut JustificationProver,
        var: &Term,
        placeholder: Option<&Term>,
        root: &Term,
        mode: Mode,
    ) -> bool {
        let mut bound = Vec::with_capacity(root.num_args());
        for arg in root.iter_args() {
            bound.push(self.prove_bound(theory, prover, var, placeholder, arg, mode));
        }
        if bound.iter().all(|&b| b) {
            return root.get_head_atom() != var.get_head_atom();
        }

        let Atom::Symbol(symbol) = *root.get_head_atom() else {
            return false;
        };

        if !self.tables.contains_key(&symbol) {
            if mode == Mode::Slow {
                return self.is_bound(theory, prover, var, placeholder, root);
            }
            let table = self.build_table(theory, prover, symbol);
            self.tables.insert(symbol, Some(table));
        }

        let covered = match self.tables.get(&symbol) {
            Some(Some(table)) => table.coverage(&bound),
            _ => vec![false],
        };
        if covered.iter().all(|&c| c) {
            return true;
        }
        mode == Mode::Slow && self.is_bound(theory, prover, var, placeholder, root)
    }

    /// Picks a placeholder class term built from a set variable not in taken.
    pub fn placeholder(theory: &Theory, taken: &mut BTreeSet<AtomId>) -> Option<Term> {
        let connectives = theory.connectives();
        let var = theory.fresh_variable_term(connectives.set_type?, taken)?;
        connectives.box_to_type(&var, None, connectives.class_type?)
    }

    /// The term that stands in for a set variable at a position of the given type:
    /// the variable itself, its class, or the wff that it is a member of itself.
    fn boxed_variable(theory: &Theory, var: &Term, target: &Term) -> Option<Term> {
        let connectives = theory.connectives();
        let class = connectives
            .class_type
            .and_then(|class_type| connectives.box_to_type(var, None, class_type));
        connectives.box_to_type(var, class.as_ref(), target.get_term_type())
    }

    /// Constructs the table for a symbol from its syntax prototype, by asking the prover
    /// about each pair of positions.
    fn build_table(
        &mut self,
        theory: &Theory,
        prover: &mut JustificationProver,
        symbol: AtomId,
    ) -> BoundnessTable {
        debug_assert!(theory.atom_seq(&Atom::Symbol(symbol)) < prover.before());
        let prototype = &theory.symbols().syntax(symbol).prototype;
        let connectives = theory.connectives();
        let mut taken = prototype.variables();
        let placeholder = BoundnessOracle::placeholder(theory, &mut taken);

        let outer = std::mem::replace(&mut self.building, true);
        let mut rows = vec![None; prototype.num_args()];
        for (i, binder) in prototype.iter_args().enumerate() {
            if !connectives.is_set_type(binder.get_term_type()) {
                continue;
            }
            let mut row = vec![false; prototype.num_args()];
            for (j, target) in prototype.iter_args().enumerate() {
                let Some(target_var) = target.atomic_variable() else {
                    continue;
                };
                let Some(replacement) = BoundnessOracle::boxed_variable(theory, binder, target)
                else {
                    continue;
                };
                let map = HashMap::from([(target_var, replacement)]);
                let term = prototype.replace_variables(&map);
                row[j] = self.prove_bound(
                    theory,
                    prover,
                    binder,
                    placeholder.as_ref(),
                    &term,
                    Mode::Slow,
                );
            }
            rows[i] = Some(row);
        }
        self.building = outer;

        self.tables_built += 1;
        let table = BoundnessTable::new(rows);
        debug!(
            symbol = %theory.symbols().syntax(symbol).label,
            ?table,
            "built boundness table"
        );
        table
    }

    /// Learns the table of the symbol introduced by a definition that passed,
    /// from its definiens. Declarations are only ever learned once.
    pub fn learn_definition(
        &mut self,
        theory: &Theory,
        prover: &mut JustificationProver,
        definition: &Statement,
    ) {
        let root = &definition.expr;
        if root.num_args() != 2 {
            return;
        }
        let definiendum = root.get_arg(0);
        let definiens = root.get_arg(1);
        let Atom::Symbol(symbol) = *definiendum.get_head_atom() else {
            return;
        };
        if self.tables.contains_key(&symbol) {
            return;
        }
        if definiendum.iter_args().any(|arg| !arg.is_variable()) {
            trace!(definition = %definition.label, "declined boundness table");
            self.tables_declined += 1;
            self.tables.insert(symbol, None);
            return;
        }

        let connectives = theory.connectives();
        let mut taken = definiens.variables();
        let placeholder = BoundnessOracle::placeholder(theory, &mut taken);

        let args = definiendum.args();
        let mut rows = vec![None; args.len()];
        for (i, binder) in args.iter().enumerate() {
            if !connectives.is_set_type(binder.get_term_type()) {
                continue;
            }
            let mut row = vec![false; args.len()];
            for (j, target) in args.iter().enumerate() {
                if i == j {
                    row[j] = true;
                    continue;
                }
                let Some(target_var) = target.atomic_variable() else {
                    continue;
                };
                let Some(replacement) = BoundnessOracle::boxed_variable(theory, binder, target)
                else {
                    continue;
                };
                let map = HashMap::from([(target_var, replacement)]);
                let term = definiens.replace_variables(&map);
                row[j] = self.prove_bound(
                    theory,
                    prover,
                    binder,
                    placeholder.as_ref(),
                    &term,
                    Mode::Fast,
                );
            }
            rows[i] = Some(row);
        }

        self.tables_learned += 1;
        let table = BoundnessTable::new(rows);
        debug!(definition = %definition.label, ?table, "learned boundness table");
        self.tables.insert(symbol, Some(table));
    }
}
