use std::collections::BTreeSet;

use crate::kernel::atom::AtomId;
use crate::kernel::term::Term;

/// The variables of a definition, split by where they occur.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Variables that occur in the definiendum.
    pub parameters: BTreeSet<AtomId>,

    /// Variables that occur only in the definiens.
    pub dummies: BTreeSet<AtomId>,
}

impl Classification {
    pub fn new(definiendum: &Term, definiens: &Term) -> Classification {
        let parameters = definiendum.variables();
        let dummies = definiens
            .variables()
            .into_iter()
            .filter(|v| !parameters.contains(v))
            .collect();
        Classification {
            parameters,
            dummies,
        }
    }

    pub fn has_dummies(&self) -> bool {
        !self.dummies.is_empty()
    }

    /// Every variable of the definition.
    pub fn all(&self) -> BTreeSet<AtomId> {
        self.parameters.union(&self.dummies).copied().collect()
    }
}
