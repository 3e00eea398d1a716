use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use indoc::indoc;

use crate::builder::Builder;
use crate::checker::soundness::DefinitionReport;
use crate::checker::CheckerConfig;
use crate::kernel::symbol_table::Seq;
use crate::kernel::term::Term;
use crate::prover::{Justifier, MatchingProver, Outcome};
use crate::theory::Theory;
use crate::theory_file::TheoryFile;

/// A small piece of set.mm: the connectives, the quantifier, class abstraction,
/// and just enough lemmas about bound variables to build tables for wal and cab.
pub const SET_MM: &str = indoc! {r#"
    {
      "statements": [
        {"kind": "type", "name": "wff"},
        {"kind": "type", "name": "set"},
        {"kind": "type", "name": "class"},
        {"kind": "variable", "name": "ph", "type": "wff"},
        {"kind": "variable", "name": "ps", "type": "wff"},
        {"kind": "variable", "name": "ch", "type": "wff"},
        {"kind": "variable", "name": "x", "type": "set"},
        {"kind": "variable", "name": "y", "type": "set"},
        {"kind": "variable", "name": "z", "type": "set"},
        {"kind": "variable", "name": "w", "type": "set"},
        {"kind": "variable", "name": "A", "type": "class"},
        {"kind": "variable", "name": "B", "type": "class"},
        {"kind": "syntax", "label": "wn", "type": "wff", "args": ["ph"]},
        {"kind": "syntax", "label": "wi", "type": "wff", "args": ["ph", "ps"]},
        {"kind": "syntax", "label": "wb", "type": "wff", "args": ["ph", "ps"]},
        {"kind": "syntax", "label": "wa", "type": "wff", "args": ["ph", "ps"]},
        {"kind": "syntax", "label": "wal", "type": "wff", "args": ["x", "ph"]},
        {"kind": "syntax", "label": "cv", "type": "class", "args": ["x"]},
        {"kind": "syntax", "label": "wceq", "type": "wff", "args": ["A", "B"]},
        {"kind": "syntax", "label": "wcel", "type": "wff", "args": ["A", "B"]},
        {"kind": "syntax", "label": "cab", "type": "class", "args": ["x", "ph"]},
        {"kind": "axiom", "label": "ax-5", "expr": "wi(ph, wal(x, ph))", "dv": [["x", "ph"]]},
        {"kind": "theorem", "label": "hba1", "expr": "wi(wal(x, ph), wal(x, wal(x, ph)))"},
        {
          "kind": "theorem",
          "label": "hbn",
          "hyps": ["wi(ph, wal(x, ph))"],
          "expr": "wi(wn(ph), wal(x, wn(ph)))"
        },
        {
          "kind": "theorem",
          "label": "hbim",
          "hyps": ["wi(ph, wal(x, ph))", "wi(ps, wal(x, ps))"],
          "expr": "wi(wi(ph, ps), wal(x, wi(ph, ps)))"
        },
        {
          "kind": "theorem",
          "label": "hbab1",
          "expr": "wi(wcel(cv(y), cab(x, ph)), wal(x, wcel(cv(y), cab(x, ph))))"
        }
      ]
    }
"#};

/// The set.mm fragment, ready to have definitions added to it.
pub fn set_mm() -> Theory {
    TheoryFile::parse(SET_MM)
        .unwrap()
        .into_theory()
        .unwrap()
}

/// A MatchingProver that counts how often it is asked for a proof.
/// The count stays readable after the builder takes ownership of the prover.
pub struct CountingProver {
    inner: MatchingProver,
    calls: Rc<Cell<u32>>,
}

impl CountingProver {
    pub fn new() -> (CountingProver, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let prover = CountingProver {
            inner: MatchingProver::default(),
            calls: calls.clone(),
        };
        (prover, calls)
    }
}

impl Justifier for CountingProver {
    fn justify(&mut self, theory: &Theory, goal: &Term, before: Seq) -> Outcome {
        self.calls.set(self.calls.get() + 1);
        self.inner.justify(theory, goal, before)
    }
}

/// Checks every axiom in order with a fresh builder, and returns the reports by label.
pub fn check_all(theory: &Theory, config: CheckerConfig) -> HashMap<String, DefinitionReport> {
    let mut builder = Builder::new(theory, config, MatchingProver::default(), |_| {});
    let mut reports = HashMap::new();
    for index in builder.definitions() {
        let report = builder.check_definition(index);
        reports.insert(theory.statement(index).label.clone(), report);
    }
    reports
}

/// The report for a single definition, checked after everything before it.
pub fn check(theory: &Theory, label: &str) -> DefinitionReport {
    check_all(theory, CheckerConfig::default())
        .remove(label)
        .unwrap()
}
