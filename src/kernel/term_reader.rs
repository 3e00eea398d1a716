use std::iter::Peekable;
use std::str::CharIndices;

use crate::kernel::atom::Atom;
use crate::kernel::symbol_table::SymbolTable;
use crate::kernel::term::Term;

/// How deeply applications may nest in a single term.
pub const MAX_NESTING: usize = 512;

/// Reads terms written in prefix notation, like "wi(ph, wal(x, ps))".
/// Names are resolved against a SymbolTable and every application is type checked
/// against the prototype of its symbol.
struct TermReader<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
    table: &'a SymbolTable,
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')' && c != ','
}

impl<'a> TermReader<'a> {
    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn read_name(&mut self) -> Result<&'a str, String> {
        self.skip_whitespace();
        let start = match self.chars.peek() {
            Some(&(i, c)) if is_name_char(c) => i,
            Some(&(i, c)) => return Err(format!("unexpected '{}' at offset {}", c, i)),
            None => return Err("unexpected end of term".to_string()),
        };
        let mut end = self.text.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if !is_name_char(c) {
                end = i;
                break;
            }
            self.chars.next();
        }
        Ok(&self.text[start..end])
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if let Some(&(_, c)) = self.chars.peek() {
            if c == expected {
                self.chars.next();
                return true;
            }
        }
        false
    }

    fn read_term(&mut self, depth: usize) -> Result<Term, String> {
        if depth > MAX_NESTING {
            return Err(format!("term is nested more than {} deep", MAX_NESTING));
        }
        let name = self.read_name()?;
        let atom = self
            .table
            .get_atom(name)
            .ok_or_else(|| format!("unknown name '{}'", name))?;

        let mut args = vec![];
        if self.eat('(') {
            loop {
                args.push(self.read_term(depth + 1)?);
                if self.eat(')') {
                    break;
                }
                if !self.eat(',') {
                    return Err(format!("expected ',' or ')' in the arguments of {}", name));
                }
            }
        }

        match atom {
            Atom::Variable(id) => {
                if !args.is_empty() {
                    return Err(format!("variable {} cannot take arguments", name));
                }
                Ok(Term::new_variable(self.table.var_type(id), id))
            }
            Atom::Symbol(id) => {
                let decl = self.table.syntax(id);
                if decl.prototype.num_args() != args.len() {
                    return Err(format!(
                        "{} takes {} arguments but got {}",
                        name,
                        decl.prototype.num_args(),
                        args.len()
                    ));
                }
                for (i, (expected, actual)) in decl.prototype.iter_args().zip(&args).enumerate() {
                    if expected.get_term_type() != actual.get_term_type() {
                        return Err(format!(
                            "argument {} of {} should have type {} but has type {}",
                            i + 1,
                            name,
                            self.table.type_name(expected.get_term_type()),
                            self.table.type_name(actual.get_term_type())
                        ));
                    }
                }
                Ok(Term::new(decl.term_type, atom, args))
            }
        }
    }
}

impl SymbolTable {
    /// Parses a term in prefix notation.
    pub fn parse_term(&self, text: &str) -> Result<Term, String> {
        let mut reader = TermReader {
            text,
            chars: text.char_indices().peekable(),
            table: self,
        };
        let term = reader.read_term(0)?;
        reader.skip_whitespace();
        if let Some((i, _)) = reader.chars.peek() {
            return Err(format!("unexpected trailing text at offset {}: {}", i, text));
        }
        Ok(term)
    }
}
