use std::collections::BTreeSet;

use tracing::debug;

use crate::checker::classifier::Classification;
use crate::checker::diagnostic::DefinitionError;
use crate::kernel::atom::AtomId;
use crate::kernel::term::Term;
use crate::statement::Statement;
use crate::theory::Theory;

/// The structural checks on a definition: the shape of its root, the order of declarations,
/// and its distinct variable conditions.
pub struct DisjointnessChecker<'a> {
    theory: &'a Theory,
    definition: &'a Statement,
}

impl<'a> DisjointnessChecker<'a> {
    pub fn new(theory: &'a Theory, definition: &'a Statement) -> Self {
        DisjointnessChecker { theory, definition }
    }

    /// Splits the definition into definiendum and definiens.
    /// Fails unless the root is a designated equality with two sides.
    pub fn sides(&self) -> Result<(&'a Term, &'a Term), DefinitionError> {
        let expr = &self.definition.expr;
        if !self
            .theory
            .connectives()
            .is_equality(expr.get_head_atom())
            || expr.num_args() != 2
        {
            return Err(DefinitionError::NotEquality);
        }
        Ok((expr.get_arg(0), expr.get_arg(1)))
    }

    /// No axiom from the defined symbol up to the definition itself may use the symbol,
    /// other than the first use inside the definition.
    pub fn check_forward_use(&self, definiendum: &Term) -> Option<DefinitionError> {
        let defined = *definiendum.get_head_atom();
        let start = self.theory.atom_seq(&defined);
        let end = self.definition.seq;
        for axiom in self.theory.axioms_between(start, end) {
            let mut first = axiom.seq == self.definition.seq;
            for atom in axiom.expr.rpn() {
                if atom != defined {
                    continue;
                }
                if first {
                    first = false;
                    continue;
                }
                debug!(
                    definition = %self.definition.label,
                    statement = %axiom.label,
                    "forward use"
                );
                return Some(DefinitionError::ForwardUse {
                    statement: axiom.label.to_string(),
                });
            }
        }
        None
    }

    fn are_distinct(&self, a: AtomId, b: AtomId) -> bool {
        self.definition.frame.are_distinct(a, b)
    }

    fn names(&self, vars: &BTreeSet<AtomId>) -> Vec<String> {
        vars.iter()
            .map(|&id| self.theory.var_name(id).to_string())
            .collect()
    }

    /// Parameters must not be required to be distinct from each other.
    pub fn check_parameters(&self, classification: &Classification) -> Option<DefinitionError> {
        let mut bad = BTreeSet::new();
        for &a in &classification.parameters {
            for &b in &classification.parameters {
                if a != b && self.are_distinct(a, b) {
                    bad.insert(a);
                    bad.insert(b);
                }
            }
        }
        if bad.is_empty() {
            return None;
        }
        Some(DefinitionError::DistinctParameters {
            variables: self.names(&bad),
        })
    }

    /// Dummies must be distinct from each other and from every parameter.
    /// The error suggests the "$d" groups that would fix the definition.
    pub fn check_dummies(&self, classification: &Classification) -> Option<DefinitionError> {
        let dummies = &classification.dummies;
        let mut bad = BTreeSet::new();
        for &a in dummies {
            for &b in dummies {
                if a != b && !self.are_distinct(a, b) {
                    bad.insert(a);
                    bad.insert(b);
                }
            }
        }

        let mut groups = vec![];
        for &param in &classification.parameters {
            let conflicts: Vec<AtomId> = dummies
                .iter()
                .copied()
                .filter(|&d| !self.are_distinct(param, d))
                .collect();
            if conflicts.is_empty() {
                continue;
            }
            let mut group = bad.clone();
            group.insert(param);
            group.extend(conflicts);
            groups.push(self.names(&group));
        }
        if groups.is_empty() && !bad.is_empty() {
            groups.push(self.names(&bad));
        }

        if groups.is_empty() {
            return None;
        }
        Some(DefinitionError::MissingDistinct { groups })
    }

    /// Runs the checks that accumulate: forward use, then distinctness.
    pub fn check(
        &self,
        definiendum: &Term,
        classification: &Classification,
    ) -> Vec<DefinitionError> {
        let mut errors = vec![];
        errors.extend(self.check_forward_use(definiendum));
        errors.extend(self.check_parameters(classification));
        errors.extend(self.check_dummies(classification));
        errors
    }
}
