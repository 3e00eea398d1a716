use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::checker::boundness::{BoundnessOracle, Mode};
use crate::checker::classifier::Classification;
use crate::checker::diagnostic::DefinitionError;
use crate::checker::disjointness::DisjointnessChecker;
use crate::checker::justification::JustificationProver;
use crate::kernel::atom::AtomId;
use crate::kernel::term::Term;
use crate::statement::Statement;
use crate::theory::Theory;

/// What checking a single definition found.
#[derive(Clone, Debug, Default)]
pub struct DefinitionReport {
    pub errors: Vec<DefinitionError>,

    /// Whether the dummies were handled by a direct justification theorem.
    pub justified: bool,
}

impl DefinitionReport {
    pub fn is_sound(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks that an axiom is a conservative definition: a new symbol on one side of an
/// equality, with nothing on the other side that the new symbol could smuggle in.
pub struct SoundnessChecker<'a> {
    theory: &'a Theory,

    /// Whether to look for a justification theorem before checking dummies one by one.
    pub try_justification: bool,
}

impl<'a> SoundnessChecker<'a> {
    pub fn new(theory: &'a Theory) -> Self {
        SoundnessChecker {
            theory,
            try_justification: true,
        }
    }

    /// Tries to prove that renaming the dummies doesn't change the definiens:
    /// "definiens = definiens with fresh dummies", with the definition's own equality.
    fn justify_directly(
        &self,
        prover: &mut JustificationProver,
        root: &Term,
        definiens: &Term,
        classification: &Classification,
        taken: &mut BTreeSet<AtomId>,
    ) -> bool {
        let mut renaming = HashMap::new();
        for &dummy in &classification.dummies {
            let var_type = self.theory.symbols().var_type(dummy);
            let Some(fresh) = self.theory.fresh_variable_term(var_type, taken) else {
                return false;
            };
            renaming.insert(dummy, fresh);
        }
        let renamed = definiens.replace_variables(&renaming);
        let goal = Term::new(
            root.get_term_type(),
            *root.get_head_atom(),
            vec![definiens.clone(), renamed],
        );
        prover.prove(self.theory, &goal)
    }

    pub fn check(
        &self,
        oracle: &mut BoundnessOracle,
        prover: &mut JustificationProver,
        definition: &Statement,
    ) -> DefinitionReport {
        let mut report = DefinitionReport::default();
        let disjointness = DisjointnessChecker::new(self.theory, definition);
        let (definiendum, definiens) = match disjointness.sides() {
            Ok(sides) => sides,
            Err(e) => {
                report.errors.push(e);
                return report;
            }
        };

        let classification = Classification::new(definiendum, definiens);
        report
            .errors
            .extend(disjointness.check(definiendum, &classification));
        if !classification.has_dummies() {
            return report;
        }

        let mut taken = classification.all();
        if self.try_justification
            && self.justify_directly(
                prover,
                &definition.expr,
                definiens,
                &classification,
                &mut taken,
            )
        {
            debug!(definition = %definition.label, "justified directly");
            report.justified = true;
            return report;
        }

        let connectives = self.theory.connectives();
        let placeholder = BoundnessOracle::placeholder(self.theory, &mut taken);

        let mut unbound = vec![];
        for &dummy in &classification.dummies {
            let var_type = self.theory.symbols().var_type(dummy);
            if !connectives.is_set_type(var_type) {
                report.errors.push(DefinitionError::NonSetDummy {
                    variable: self.theory.var_name(dummy).to_string(),
                });
                return report;
            }

            let var = Term::new_variable(var_type, dummy);
            let bound = oracle.prove_bound(
                self.theory,
                prover,
                &var,
                placeholder.as_ref(),
                definiens,
                Mode::Fast,
            ) || oracle.prove_bound(
                self.theory,
                prover,
                &var,
                placeholder.as_ref(),
                definiens,
                Mode::Slow,
            );
            trace!(
                definition = %definition.label,
                dummy = %self.theory.var_name(dummy),
                bound,
                "dummy checked"
            );
            if !bound {
                unbound.push(self.theory.var_name(dummy).to_string());
            }
        }
        if !unbound.is_empty() {
            report
                .errors
                .push(DefinitionError::UnboundDummies { variables: unbound });
        }
        report
    }
}
