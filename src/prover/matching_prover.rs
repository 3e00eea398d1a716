use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::kernel::atom::Atom;
use crate::kernel::symbol_table::Seq;
use crate::kernel::term::Term;
use crate::kernel::variable_map::VariableMap;
use crate::prover::{Justifier, Outcome, ProverParams};
use crate::statement::Statement;
use crate::theory::Theory;

/// The search ran out of steps.
struct OutOfSteps;

/// A small backward-chaining prover.
/// To prove a goal, it looks for an assertion whose conclusion specializes to the goal,
/// such that every hypothesis becomes fully determined by the match and can itself be proved.
/// There is no unification, so assertions like modus ponens, whose hypotheses mention
/// variables the conclusion doesn't, can't be used.
///
/// A prover indexes the statements of one theory as it sees them, so it shouldn't be
/// shared between theories.
pub struct MatchingProver {
    params: ProverParams,

    /// Statements whose conclusion has a symbol head, keyed by that symbol.
    by_head: HashMap<Atom, Vec<usize>>,

    /// Statements whose conclusion is a bare variable. They could match anything.
    by_variable: Vec<usize>,

    /// How many statements of the theory are already indexed.
    indexed: usize,

    // Scratch state for a single search.
    steps: u32,
    proved: HashSet<Term>,

    /// The largest remaining depth at which each goal has failed.
    failed: HashMap<Term, u32>,
    in_progress: HashSet<Term>,
}

impl MatchingProver {
    pub fn new(params: ProverParams) -> MatchingProver {
        MatchingProver {
            params,
            by_head: HashMap::new(),
            by_variable: vec![],
            indexed: 0,
            steps: 0,
            proved: HashSet::new(),
            failed: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn params(&self) -> &ProverParams {
        &self.params
    }

    /// Indexes any statements added to the theory since the last search.
    fn update_index(&mut self, theory: &Theory) {
        let statements = theory.statements();
        for (index, statement) in statements.iter().enumerate().skip(self.indexed) {
            if statement.expr.is_variable() {
                self.by_variable.push(index);
            } else {
                self.by_head
                    .entry(*statement.expr.get_head_atom())
                    .or_default()
                    .push(index);
            }
        }
        self.indexed = statements.len();
    }

    /// Tries to use the statement to prove the goal.
    /// Returns the hypotheses that would remain, or None if it doesn't apply.
    fn instantiate(statement: &Statement, goal: &Term) -> Option<Vec<Term>> {
        let mut map = VariableMap::new();
        if !map.match_terms(&statement.expr, goal) {
            return None;
        }
        let mut subgoals = vec![];
        for hyp in &statement.hypotheses {
            subgoals.push(map.specialize(hyp)?);
        }

        // Variables the statement requires to be distinct can't be mapped to terms
        // that have a variable in common.
        for pair in statement.frame.iter() {
            if !map.has_mapping(pair.lo) || !map.has_mapping(pair.hi) {
                continue;
            }
            let lo = map.image_variables(pair.lo);
            let hi = map.image_variables(pair.hi);
            if !lo.is_disjoint(&hi) {
                return None;
            }
        }
        Some(subgoals)
    }

    fn prove(
        &mut self,
        theory: &Theory,
        goal: &Term,
        before: Seq,
        remaining: u32,
    ) -> Result<bool, OutOfSteps> {
        if self.proved.contains(goal) {
            return Ok(true);
        }
        if let Some(&depth) = self.failed.get(goal) {
            if depth >= remaining {
                return Ok(false);
            }
        }
        if remaining == 0 || self.in_progress.contains(goal) {
            return Ok(false);
        }
        self.steps += 1;
        if self.steps > self.params.max_steps {
            return Err(OutOfSteps);
        }

        let mut candidates: Vec<usize> = self
            .by_head
            .get(goal.get_head_atom())
            .cloned()
            .unwrap_or_default();
        candidates.extend(self.by_variable.iter().copied());

        self.in_progress.insert(goal.clone());
        let mut answer = Ok(false);
        for index in candidates {
            let statement = theory.statement(index);
            if statement.seq >= before {
                continue;
            }
            let Some(subgoals) = MatchingProver::instantiate(statement, goal) else {
                continue;
            };
            let mut success = true;
            for subgoal in &subgoals {
                match self.prove(theory, subgoal, before, remaining - 1) {
                    Ok(true) => {}
                    Ok(false) => {
                        success = false;
                        break;
                    }
                    Err(e) => {
                        self.in_progress.remove(goal);
                        return Err(e);
                    }
                }
            }
            if success {
                trace!(goal = %goal, statement = %statement.label, "proved");
                answer = Ok(true);
                break;
            }
        }
        self.in_progress.remove(goal);

        match answer {
            Ok(true) => {
                self.proved.insert(goal.clone());
            }
            Ok(false) => {
                let depth = self.failed.entry(goal.clone()).or_insert(0);
                *depth = (*depth).max(remaining);
            }
            Err(_) => {}
        }
        answer
    }
}

impl Default for MatchingProver {
    fn default() -> Self {
        MatchingProver::new(ProverParams::default())
    }
}

impl Justifier for MatchingProver {
    fn justify(&mut self, theory: &Theory, goal: &Term, before: Seq) -> Outcome {
        self.update_index(theory);
        self.steps = 0;
        self.proved.clear();
        self.failed.clear();
        self.in_progress.clear();

        let outcome = match self.prove(theory, goal, before, self.params.max_depth) {
            Ok(true) => Outcome::Success,
            Ok(false) => Outcome::Exhausted,
            Err(OutOfSteps) => Outcome::Constrained,
        };
        trace!(goal = %theory.display(goal), steps = self.steps, %outcome, "search finished");
        outcome
    }
}
