use std::sync::atomic::AtomicU32;
use std::time::Instant;

use tracing::{debug, info};

use crate::checker::boundness::BoundnessOracle;
use crate::checker::diagnostic::DefinitionError;
use crate::checker::justification::JustificationProver;
use crate::checker::soundness::{DefinitionReport, SoundnessChecker};
use crate::checker::CheckerConfig;
use crate::kernel::symbol_table::Seq;
use crate::prover::Justifier;
use crate::theory::Theory;

static NEXT_BUILD_ID: AtomicU32 = AtomicU32::new(1);

/// The Builder contains all the mutable state for a single run of the definition checker
/// over a theory. The boundness tables it learns are only valid for that theory.
pub struct Builder<'a> {
    theory: &'a Theory,

    config: CheckerConfig,

    /// Proves the goals that the checks generate.
    justifier: Box<dyn Justifier + 'a>,

    /// A single event handler is used across all definitions.
    event_handler: Box<dyn FnMut(BuildEvent) + 'a>,

    /// Boundness tables learned so far in this build.
    oracle: BoundnessOracle,

    pub status: BuildStatus,

    /// A unique id for each build.
    pub id: u32,

    /// Build metrics collected during checking.
    pub metrics: BuildMetrics,
}

/// Metrics collected during a build.
#[derive(Clone, Debug, Default)]
pub struct BuildMetrics {
    /// The number of axioms in the theory.
    pub axioms_total: i32,

    /// The number of axioms skipped because they matched an exclusion pattern.
    pub axioms_excluded: i32,

    /// The number of axioms checked as definitions.
    pub definitions_checked: i32,

    /// The number of definitions that passed.
    pub definitions_sound: i32,

    /// How many definitions were handled by a justification theorem.
    pub definitions_justified: i32,

    /// Boundness tables constructed from syntax axioms.
    pub tables_built: i32,

    /// Boundness tables learned from definitions.
    pub tables_learned: i32,

    /// Definitions too complicated to learn a boundness table from.
    pub tables_declined: i32,

    /// The number of goals the checks asked about.
    pub prover_queries: i32,

    /// The number of goals that were actually searched for.
    pub prover_searches: i32,

    /// Number of searches that ended in success.
    pub prover_successes: i32,

    /// The total amount of time spent checking, in seconds.
    pub check_time: f64,
}

impl BuildMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&self, status: BuildStatus) {
        println!();
        if self.axioms_excluded > 0 {
            println!(
                "{}/{} axioms excluded",
                self.axioms_excluded, self.axioms_total
            );
        }
        if self.definitions_justified > 0 {
            println!(
                "{} definitions justified directly",
                self.definitions_justified
            );
        }
        println!(
            "{} boundness tables ({} built, {} learned, {} declined)",
            self.tables_built + self.tables_learned,
            self.tables_built,
            self.tables_learned,
            self.tables_declined
        );
        println!(
            "{} searches performed ({} queries)",
            self.prover_searches, self.prover_queries
        );
        if self.prover_searches > 0 {
            let success_percent =
                100.0 * self.prover_successes as f64 / self.prover_searches as f64;
            println!("{:.2}% search success rate", success_percent);
        }
        if self.definitions_checked > 0 {
            let time_ms = 1000.0 * self.check_time / self.definitions_checked as f64;
            println!("{:.1} ms average check time", time_ms);
        }
        println!(
            "{}/{} OK",
            self.definitions_sound, self.definitions_checked
        );
        match status {
            BuildStatus::Warning => {
                println!("Definition check failed.");
            }
            BuildStatus::Good => {
                println!("Definition check succeeded.");
            }
        }
    }
}

/// A build reports one event for each definition that fails.
#[derive(Debug, Clone)]
pub struct BuildEvent {
    /// Which build this is an event for.
    pub build_id: u32,

    /// The label of the definition.
    pub label: String,

    pub seq: Seq,

    /// Everything that is wrong with the definition.
    pub diagnostics: Vec<DefinitionError>,
}

impl BuildEvent {
    /// Human-readable messages, one per diagnostic.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| d.message(&self.label))
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BuildStatus {
    /// Every definition checked out.
    Good,

    /// Some definition failed a check.
    Warning,
}

impl BuildStatus {
    pub fn verb(&self) -> &str {
        match self {
            BuildStatus::Good => "succeeded",
            BuildStatus::Warning => "warned",
        }
    }

    pub fn warn(&mut self) {
        if *self == BuildStatus::Good {
            *self = BuildStatus::Warning;
        }
    }

    pub fn is_good(&self) -> bool {
        matches!(self, BuildStatus::Good)
    }
}

impl<'a> Builder<'a> {
    pub fn new(
        theory: &'a Theory,
        config: CheckerConfig,
        justifier: impl Justifier + 'a,
        event_handler: impl FnMut(BuildEvent) + 'a,
    ) -> Self {
        Builder {
            theory,
            config,
            justifier: Box::new(justifier),
            event_handler: Box::new(event_handler),
            oracle: BoundnessOracle::new(),
            status: BuildStatus::Good,
            id: NEXT_BUILD_ID.fetch_add(1, std::sync::atomic::Ordering::SeqCst),
            metrics: BuildMetrics::new(),
        }
    }

    pub fn oracle(&self) -> &BoundnessOracle {
        &self.oracle
    }

    /// The indices of the axioms to check, in sequence order.
    pub fn definitions(&self) -> Vec<usize> {
        self.theory
            .statements()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_axiom() && !self.config.exclusions.is_excluded(&s.label))
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks a single definition, and learns its boundness table if it passes.
    /// Definitions should be checked in sequence order, so that everything a definition
    /// depends on has been learned first.
    pub fn check_definition(&mut self, index: usize) -> DefinitionReport {
        let theory = self.theory;
        let definition = theory.statement(index);
        let start = Instant::now();
        debug!(definition = %definition.label, "checking");

        let mut prover = JustificationProver::new(self.justifier.as_mut(), definition.seq);
        let mut checker = SoundnessChecker::new(theory);
        checker.try_justification = self.config.try_justification;
        let report = checker.check(&mut self.oracle, &mut prover, definition);
        if report.is_sound() {
            self.oracle
                .learn_definition(theory, &mut prover, definition);
        }

        self.metrics.prover_queries += prover.queries as i32;
        self.metrics.prover_searches += prover.searches as i32;
        self.metrics.prover_successes += prover.successes as i32;
        self.metrics.definitions_checked += 1;
        self.metrics.check_time += start.elapsed().as_secs_f64();
        if report.justified {
            self.metrics.definitions_justified += 1;
        }

        if report.is_sound() {
            self.metrics.definitions_sound += 1;
        } else {
            debug!(
                definition = %definition.label,
                errors = report.errors.len(),
                "definition failed"
            );
            self.status.warn();
            let event = BuildEvent {
                build_id: self.id,
                label: definition.label.clone(),
                seq: definition.seq,
                diagnostics: report.errors.clone(),
            };
            (self.event_handler)(event);
        }
        report
    }

    /// Checks every axiom that isn't excluded, in sequence order.
    pub fn build(&mut self) {
        let definitions = self.definitions();
        let axioms_total = self
            .theory
            .statements()
            .iter()
            .filter(|s| s.is_axiom())
            .count() as i32;
        self.metrics.axioms_total = axioms_total;
        self.metrics.axioms_excluded = axioms_total - definitions.len() as i32;
        info!(
            definitions = definitions.len(),
            excluded = self.metrics.axioms_excluded,
            "build started"
        );

        for index in definitions {
            self.check_definition(index);
        }

        self.metrics.tables_built = self.oracle.tables_built as i32;
        self.metrics.tables_learned = self.oracle.tables_learned as i32;
        self.metrics.tables_declined = self.oracle.tables_declined as i32;
        info!(status = self.status.verb(), "build finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::MatchingProver;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn theory() -> Theory {
        let mut theory = Theory::default();
        theory.add_type("wff").unwrap();
        theory.add_type("set").unwrap();
        theory.add_variable("ph", "wff").unwrap();
        theory.add_variable("ps", "wff").unwrap();
        theory.add_variable("x", "set").unwrap();
        theory.add_variable("y", "set").unwrap();
        theory.add_syntax("wn", "wff", &["ph"]).unwrap();
        theory.add_syntax("wb", "wff", &["ph", "ps"]).unwrap();
        theory.add_syntax("wal", "wff", &["x", "ph"]).unwrap();
        theory.add_axiom("ax-gen", "wal(x, ph)", &[]).unwrap();
        theory.add_syntax("wex", "wff", &["x", "ph"]).unwrap();
        theory
            .add_axiom("df-ex", "wb(wex(x, ph), wn(wal(x, wn(ph))))", &[])
            .unwrap();
        theory
    }

    #[test]
    fn test_build_reports_failures_only() {
        let theory = theory();
        let events = Rc::new(RefCell::new(vec![]));
        let events_clone = events.clone();
        let mut builder = Builder::new(
            &theory,
            CheckerConfig::default(),
            MatchingProver::default(),
            move |event| events_clone.borrow_mut().push(event),
        );
        builder.build();
        assert_eq!(builder.status, BuildStatus::Warning);
        assert_eq!(builder.metrics.axioms_total, 2);
        assert_eq!(builder.metrics.definitions_checked, 2);
        assert_eq!(builder.metrics.definitions_sound, 1);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].label, "ax-gen");
        assert_eq!(events[0].diagnostics, vec![DefinitionError::NotEquality]);
        assert!(events[0].messages()[0].starts_with("I-PA-0201 Axiom ax-gen"));
    }

    #[test]
    fn test_build_with_exclusions() {
        let theory = theory();
        let config = CheckerConfig {
            exclusions: crate::filter::ExclusionFilter::parse("ax-*").unwrap(),
            ..CheckerConfig::default()
        };
        let mut builder = Builder::new(&theory, config, MatchingProver::default(), |_| {});
        builder.build();
        assert!(builder.status.is_good());
        assert_eq!(builder.metrics.axioms_excluded, 1);
        assert_eq!(builder.metrics.definitions_checked, 1);
        assert_eq!(builder.metrics.tables_learned, 1);
        let wex = theory.symbols().get_symbol("wex").unwrap();
        assert!(builder.oracle().table(wex).is_some());
    }
}
