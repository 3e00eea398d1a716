use std::fmt;

use crate::kernel::atom::Atom;
use crate::kernel::symbol_table::SymbolTable;
use crate::kernel::term::Term;

struct DisplayAtom<'a> {
    atom: Atom,
    table: &'a SymbolTable,
}

impl fmt::Display for DisplayAtom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.table.atom_str(&self.atom))
    }
}

/// Displays a term with the declared names of its atoms, in the same prefix notation
/// that theory files use.
pub struct DisplayTerm<'a> {
    pub term: &'a Term,
    pub table: &'a SymbolTable,
}

impl DisplayTerm<'_> {
    pub fn new<'a>(term: &'a Term, table: &'a SymbolTable) -> DisplayTerm<'a> {
        DisplayTerm { term, table }
    }
}

impl fmt::Display for DisplayTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            DisplayAtom {
                atom: *self.term.get_head_atom(),
                table: self.table
            }
        )?;
        if self.term.num_args() > 0 {
            write!(f, "(")?;
            for (i, arg) in self.term.iter_args().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(
                    f,
                    "{}",
                    DisplayTerm {
                        term: arg,
                        table: self.table
                    }
                )?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
