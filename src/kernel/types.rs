use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the typecodes declared in a theory, like "wff", "set", or "class".
/// Ids are assigned in declaration order by the SymbolTable.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default,
)]
pub struct TypeId(pub u16);

impl TypeId {
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
