// The defcheck CLI.
// Checks that the definitions in a theory file are sound.

use std::path::PathBuf;

use clap::Parser;
use defcheck::checker::CheckerConfig;
use defcheck::filter::ExclusionFilter;
use defcheck::prover::ProverParams;
use defcheck::verifier::Verifier;
use mimalloc::MiMalloc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(
    name = "defcheck",
    about = "Checks that the definitions of a theory are conservative",
    long_about = "Checks every axiom of a theory file as a definition.\n\nA definition must be an equality whose left side introduces a new symbol, \
                  and whose dummy variables are all bound on the right side.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    /// The theory file to check
    #[clap(value_name = "THEORY")]
    theory: PathBuf,

    /// Axioms to skip, as a comma-separated list of label patterns
    #[clap(
        long,
        help = "Skip axioms matching these comma-separated patterns. '*' matches anything.",
        value_name = "PATTERNS"
    )]
    exclude: Option<String>,

    /// Don't look for a justification theorem
    #[clap(long, help = "Don't look for a justification theorem for dummy variables.")]
    no_justify: bool,

    /// How deeply the prover may nest assertions
    #[clap(long, value_name = "N")]
    max_depth: Option<u32>,

    /// How many goals a single proof search may visit
    #[clap(long, value_name = "N")]
    max_steps: Option<u32>,

    /// Print debugging output
    #[clap(long, short)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Use RUST_LOG env var to control log levels, e.g.:
    //   RUST_LOG=defcheck::checker=trace defcheck set.json
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let exclusions = match &args.exclude {
        Some(list) => match ExclusionFilter::parse(list) {
            Ok(filter) => filter,
            Err(e) => {
                println!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => ExclusionFilter::default(),
    };

    let mut prover = ProverParams::default();
    if let Some(depth) = args.max_depth {
        prover.max_depth = depth;
    }
    if let Some(steps) = args.max_steps {
        prover.max_steps = steps;
    }

    let config = CheckerConfig {
        exclusions,
        try_justification: !args.no_justify,
        prover,
    };
    let mut verifier = Verifier::new(args.theory, config);
    verifier.verbose = args.verbose;

    match verifier.run() {
        Err(e) => {
            println!("{}", e);
            std::process::exit(1);
        }
        Ok(output) => {
            if !output.is_success() {
                std::process::exit(1);
            }
        }
    }
}
