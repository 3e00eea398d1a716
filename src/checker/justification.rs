use std::collections::HashMap;

use tracing::trace;

use crate::kernel::symbol_table::Seq;
use crate::kernel::term::Term;
use crate::prover::Justifier;
use crate::theory::Theory;

/// Asks a Justifier whether goals are provable, while checking a single definition.
/// Goals about the definition only see assertions that come before it.
/// Goals about a syntax symbol, which end up in boundness tables that outlive the
/// definition, see the whole theory.
/// Answers are remembered for as long as the adapter lives, so one adapter should be made
/// per definition.
pub struct JustificationProver<'a> {
    justifier: &'a mut dyn Justifier,
    before: Seq,
    memo: HashMap<Term, bool>,
    registry_memo: HashMap<Term, bool>,

    /// How many goals were asked about, including repeats.
    pub queries: u32,

    /// How many goals were passed on to the justifier.
    pub searches: u32,

    /// How many of those searches succeeded.
    pub successes: u32,
}

impl<'a> JustificationProver<'a> {
    pub fn new(justifier: &'a mut dyn Justifier, before: Seq) -> Self {
        JustificationProver {
            justifier,
            before,
            memo: HashMap::new(),
            registry_memo: HashMap::new(),
            queries: 0,
            searches: 0,
            successes: 0,
        }
    }

    /// The sequence number of the definition being checked.
    pub fn before(&self) -> Seq {
        self.before
    }

    /// Whether the goal is a theorem, using only what comes before the definition.
    /// Anything short of a proof counts as "no".
    pub fn prove(&mut self, theory: &Theory, goal: &Term) -> bool {
        self.search(theory, goal, false)
    }

    /// Whether the goal is a theorem of the whole theory.
    pub fn prove_in_registry(&mut self, theory: &Theory, goal: &Term) -> bool {
        self.search(theory, goal, true)
    }

    fn search(&mut self, theory: &Theory, goal: &Term, registry: bool) -> bool {
        self.queries += 1;
        let (memo, before) = if registry {
            (&mut self.registry_memo, Seq::MAX)
        } else {
            (&mut self.memo, self.before)
        };
        if let Some(&answer) = memo.get(goal) {
            return answer;
        }
        self.searches += 1;
        let outcome = self.justifier.justify(theory, goal, before);
        trace!(goal = %theory.display(goal), before, %outcome, "justification search");
        let answer = outcome.is_success();
        if answer {
            self.successes += 1;
        }
        memo.insert(goal.clone(), answer);
        answer
    }
}
