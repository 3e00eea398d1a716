use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::builder::{BuildEvent, BuildMetrics, BuildStatus, Builder};
use crate::checker::CheckerConfig;
use crate::prover::MatchingProver;
use crate::theory::Theory;

/// Output from running the verifier
#[derive(Debug)]
pub struct VerifierOutput {
    /// The overall build status
    pub status: BuildStatus,

    /// Build metrics collected during checking
    pub metrics: BuildMetrics,

    /// All build events collected during checking
    pub events: Vec<BuildEvent>,
}

impl VerifierOutput {
    /// Labels of the definitions that failed, in order.
    pub fn failed_labels(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Good
    }
}

/// The Verifier manages the run of a single build over a theory file.
pub struct Verifier {
    config: CheckerConfig,

    /// The theory file to check.
    path: PathBuf,

    /// The verbose flag makes us print miscellaneous debug output.
    pub verbose: bool,
}

impl Verifier {
    pub fn new(path: PathBuf, config: CheckerConfig) -> Self {
        Self {
            config,
            path,
            verbose: false,
        }
    }

    /// Returns VerifierOutput if the theory could be checked, or an error string if it
    /// could not be loaded.
    pub fn run(&self) -> Result<VerifierOutput, String> {
        let theory = match Theory::load(&self.path) {
            Ok(t) => t,
            Err(e) => return Err(format!("Error: {}: {}", self.path.display(), e)),
        };
        if self.verbose {
            println!(
                "loaded {} statements and {} syntax axioms from {}",
                theory.statements().len(),
                theory.symbols().num_symbols(),
                self.path.display()
            );
        }

        // Create a vector to collect events
        let events = Rc::new(RefCell::new(Vec::new()));
        let events_clone = events.clone();

        let prover = MatchingProver::new(self.config.prover);
        let mut builder = Builder::new(&theory, self.config.clone(), prover, move |event| {
            for message in event.messages() {
                println!("{}", message);
            }
            events_clone.borrow_mut().push(event);
        });

        builder.build();
        builder.metrics.print(builder.status);

        let output = VerifierOutput {
            status: builder.status,
            metrics: builder.metrics,
            events: events.take(),
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ExclusionFilter;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use indoc::indoc;

    const THEORY: &str = indoc! {r#"
        {
          "statements": [
            {"kind": "type", "name": "wff"},
            {"kind": "type", "name": "set"},
            {"kind": "variable", "name": "ph", "type": "wff"},
            {"kind": "variable", "name": "ps", "type": "wff"},
            {"kind": "variable", "name": "x", "type": "set"},
            {"kind": "variable", "name": "y", "type": "set"},
            {"kind": "syntax", "label": "wn", "type": "wff", "args": ["ph"]},
            {"kind": "syntax", "label": "wi", "type": "wff", "args": ["ph", "ps"]},
            {"kind": "syntax", "label": "wb", "type": "wff", "args": ["ph", "ps"]},
            {"kind": "syntax", "label": "wal", "type": "wff", "args": ["x", "ph"]},
            {"kind": "syntax", "label": "wel", "type": "wff", "args": ["x", "y"]},
            {"kind": "axiom", "label": "ax-5", "expr": "wi(ph, wal(x, ph))", "dv": [["x", "ph"]]},
            {"kind": "theorem", "label": "hba1", "expr": "wi(wal(x, ph), wal(x, wal(x, ph)))"},
            {"kind": "syntax", "label": "wex", "type": "wff", "args": ["x", "ph"]},
            {"kind": "axiom", "label": "df-ex", "expr": "wb(wex(x, ph), wn(wal(x, wn(ph))))"},
            {"kind": "syntax", "label": "wfoo", "type": "wff", "args": ["ph"]},
            {"kind": "axiom", "label": "df-foo", "expr": "wb(wfoo(ph), wi(ph, wel(y, y)))", "dv": [["y", "ph"]]}
          ]
        }
    "#};

    #[test]
    fn test_verifier_basic() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("theory.json");
        file.write_str(THEORY).unwrap();

        let verifier = Verifier::new(file.path().to_path_buf(), CheckerConfig::default());
        let output = verifier.run().unwrap();

        // ax-5 isn't a definition, and y is free in the definiens of df-foo.
        assert!(!output.is_success());
        assert_eq!(output.failed_labels(), vec!["ax-5", "df-foo"]);
        assert_eq!(output.metrics.definitions_checked, 3);
        assert_eq!(output.metrics.definitions_sound, 1);
        assert_eq!(output.events[1].diagnostics.len(), 1);
        assert_eq!(output.events[1].diagnostics[0].code(), "I-PA-0206");

        temp.close().unwrap();
    }

    #[test]
    fn test_verifier_with_exclusions() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("theory.json");
        file.write_str(THEORY).unwrap();

        let config = CheckerConfig {
            exclusions: ExclusionFilter::parse("ax-*,df-foo").unwrap(),
            ..CheckerConfig::default()
        };
        let mut verifier = Verifier::new(file.path().to_path_buf(), config);
        verifier.verbose = true;
        let output = verifier.run().unwrap();
        assert!(output.is_success());
        assert_eq!(output.metrics.axioms_total, 3);
        assert_eq!(output.metrics.axioms_excluded, 2);
        assert!(output.events.is_empty());

        temp.close().unwrap();
    }

    #[test]
    fn test_verifier_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.child("nope.json").path().to_path_buf();
        let verifier = Verifier::new(path, CheckerConfig::default());
        let error = verifier.run().unwrap_err();
        assert!(error.starts_with("Error:"));
        temp.close().unwrap();
    }

    #[test]
    fn test_verifier_bad_json() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("theory.json");
        file.write_str("{\"statements\": [").unwrap();
        let verifier = Verifier::new(file.path().to_path_buf(), CheckerConfig::default());
        assert!(verifier.run().is_err());
        temp.close().unwrap();
    }
}
