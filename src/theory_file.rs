use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conventions::Conventions;
use crate::statement::{Frame, StatementKind};
use crate::theory::{Theory, TheoryError};

/// One entry of a theory file, in declaration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Type {
        name: String,
    },
    Variable {
        name: String,
        #[serde(rename = "type")]
        var_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seq: Option<u32>,
    },
    Syntax {
        label: String,
        #[serde(rename = "type")]
        term_type: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seq: Option<u32>,
    },
    Axiom(AssertionEntry),
    Theorem(AssertionEntry),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssertionEntry {
    pub label: String,
    #[serde(default)]
    pub hyps: Vec<String>,
    pub expr: String,
    #[serde(default)]
    pub dv: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u32>,
}

/// The on-disk format of a theory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TheoryFile {
    #[serde(default)]
    pub conventions: Conventions,

    pub statements: Vec<Entry>,
}

impl TheoryFile {
    pub fn parse(text: &str) -> Result<TheoryFile, TheoryError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(filename: &Path) -> Result<TheoryFile, Box<dyn Error>> {
        let text = fs::read_to_string(filename)?;
        let file = serde_json::from_str(&text)?;
        Ok(file)
    }

    /// Builds the theory, adding the entries in order.
    /// Errors name the entry that failed.
    pub fn into_theory(self) -> Result<Theory, TheoryError> {
        let mut theory = Theory::new(self.conventions);
        for (i, entry) in self.statements.into_iter().enumerate() {
            add_entry(&mut theory, entry)
                .map_err(|e| TheoryError(format!("entry {}: {}", i + 1, e)))?;
        }
        debug!(
            statements = theory.statements().len(),
            symbols = theory.symbols().num_symbols(),
            "theory loaded"
        );
        Ok(theory)
    }
}

fn add_entry(theory: &mut Theory, entry: Entry) -> Result<(), TheoryError> {
    match entry {
        Entry::Type { name } => {
            theory.add_type(&name)?;
        }
        Entry::Variable {
            name,
            var_type,
            seq,
        } => {
            theory.add_variable_at(&name, &var_type, seq)?;
        }
        Entry::Syntax {
            label,
            term_type,
            args,
            seq,
        } => {
            let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
            theory.add_syntax_at(&label, &term_type, &args, seq)?;
        }
        Entry::Axiom(assertion) => add_assertion(theory, StatementKind::Axiom, assertion)?,
        Entry::Theorem(assertion) => add_assertion(theory, StatementKind::Theorem, assertion)?,
    }
    Ok(())
}

fn add_assertion(
    theory: &mut Theory,
    kind: StatementKind,
    entry: AssertionEntry,
) -> Result<(), TheoryError> {
    let hypotheses = entry
        .hyps
        .iter()
        .map(|text| theory.parse_term(text))
        .collect::<Result<Vec<_>, _>>()?;
    let expr = theory.parse_term(&entry.expr)?;
    let mut groups = vec![];
    for group in &entry.dv {
        let names: Vec<&str> = group.iter().map(|s| s.as_str()).collect();
        groups.push(theory.variable_ids(&names)?);
    }
    theory.add_statement(
        &entry.label,
        kind,
        hypotheses,
        expr,
        Frame::from_groups(&groups),
        entry.seq,
    )?;
    Ok(())
}

impl Theory {
    /// Loads a theory from a JSON theory file.
    pub fn load(filename: &Path) -> Result<Theory, TheoryError> {
        let text = fs::read_to_string(filename)?;
        TheoryFile::parse(&text)?.into_theory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        {
          "statements": [
            {"kind": "type", "name": "wff"},
            {"kind": "type", "name": "set"},
            {"kind": "variable", "name": "ph", "type": "wff"},
            {"kind": "variable", "name": "x", "type": "set"},
            {"kind": "variable", "name": "y", "type": "set"},
            {"kind": "syntax", "label": "wal", "type": "wff", "args": ["x", "ph"]},
            {"kind": "axiom", "label": "ax-gen", "hyps": ["ph"], "expr": "wal(x, ph)"},
            {"kind": "theorem", "label": "alcom", "expr": "wal(x, wal(y, ph))", "dv": [["x", "y"]]}
          ]
        }
    "#};

    #[test]
    fn test_parse_theory_file() {
        let theory = TheoryFile::parse(SAMPLE).unwrap().into_theory().unwrap();
        let gen = theory.get_statement("ax-gen").unwrap();
        assert!(gen.is_axiom());
        assert_eq!(gen.hypotheses.len(), 1);
        let alcom = theory.get_statement("alcom").unwrap();
        assert_eq!(alcom.kind, StatementKind::Theorem);
        assert!(alcom.frame.are_distinct(1, 2));
        assert_eq!(theory.conventions(), &Conventions::default());
    }

    #[test]
    fn test_conventions_in_file() {
        let text = indoc! {r#"
            {
              "conventions": {"set_type": "setvar"},
              "statements": [{"kind": "type", "name": "setvar"}]
            }
        "#};
        let theory = TheoryFile::parse(text).unwrap().into_theory().unwrap();
        let setvar = theory.symbols().get_type("setvar").unwrap();
        assert!(theory.connectives().is_set_type(setvar));
    }

    #[test]
    fn test_errors_name_the_entry() {
        let text = indoc! {r#"
            {
              "statements": [
                {"kind": "type", "name": "wff"},
                {"kind": "variable", "name": "ph", "type": "class"}
              ]
            }
        "#};
        let error = TheoryFile::parse(text).unwrap().into_theory().err().unwrap();
        assert!(error.0.starts_with("entry 2:"));
        assert!(error.0.contains("unknown type"));

        assert!(TheoryFile::parse(r#"{"statements": [{"kind": "lemma"}]}"#).is_err());
    }

    #[test]
    fn test_explicit_seq_out_of_order() {
        let text = indoc! {r#"
            {
              "statements": [
                {"kind": "type", "name": "wff"},
                {"kind": "variable", "name": "ph", "type": "wff", "seq": 10},
                {"kind": "variable", "name": "ps", "type": "wff", "seq": 5}
              ]
            }
        "#};
        let error = TheoryFile::parse(text).unwrap().into_theory().err().unwrap();
        assert!(error.0.contains("not larger"));
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theory.json");
        fs::write(&path, SAMPLE).unwrap();
        let file = TheoryFile::parse(SAMPLE).unwrap();
        let reloaded = TheoryFile::load(&path).unwrap();
        assert_eq!(reloaded.statements.len(), file.statements.len());
        let theory = Theory::load(&path).unwrap();
        assert!(theory.get_statement("alcom").is_some());
        assert!(Theory::load(&dir.path().join("missing.json")).is_err());
    }
}
