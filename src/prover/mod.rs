use std::fmt;

use crate::kernel::symbol_table::Seq;
use crate::kernel::term::Term;
use crate::theory::Theory;

mod matching_prover;

pub use matching_prover::MatchingProver;

/// The outcome of a proof search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,

    /// Every candidate was tried within the depth limit and none worked.
    Exhausted,

    /// The search ran out of steps before it could finish.
    Constrained,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Exhausted => write!(f, "Exhausted"),
            Outcome::Constrained => write!(f, "Constrained"),
        }
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        *self == Outcome::Success
    }
}

/// Limits on a single proof search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProverParams {
    /// How many assertions deep a proof can be nested.
    pub max_depth: u32,

    /// How many goals a single search may visit.
    pub max_steps: u32,
}

impl Default for ProverParams {
    fn default() -> Self {
        ProverParams {
            max_depth: 6,
            max_steps: 10000,
        }
    }
}

/// Anything that can try to prove that a formula is a theorem of a theory.
/// The goal has no hypotheses. Its variables are arbitrary and fixed.
/// Only assertions with a sequence number below `before` may be used.
pub trait Justifier {
    fn justify(&mut self, theory: &Theory, goal: &Term, before: Seq) -> Outcome;
}
