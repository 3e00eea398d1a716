pub mod boundness;
pub mod classifier;
pub mod diagnostic;
pub mod disjointness;
pub mod justification;
pub mod soundness;

use crate::filter::ExclusionFilter;
use crate::prover::ProverParams;

/// Settings for a run of the definition checker.
#[derive(Clone, Debug)]
pub struct CheckerConfig {
    /// Axioms with matching labels are not checked.
    pub exclusions: ExclusionFilter,

    /// Whether to look for a justification theorem before checking each dummy variable.
    pub try_justification: bool,

    pub prover: ProverParams,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            exclusions: ExclusionFilter::default(),
            try_justification: true,
            prover: ProverParams::default(),
        }
    }
}
