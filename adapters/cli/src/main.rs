#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a treasure map simulation.
//!
//! Reads a map from a file (or standard input), simulates every adventurer's
//! instruction sequence and writes the resulting report to a file (or standard
//! output).

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use treasure_map_core::Scenario;
use treasure_map_format::{self as format, Dialect};
use treasure_map_system_analytics::Analytics;
use treasure_map_system_movement::simulate_with;

mod journal;

/// Simulates adventurers exploring a treasure map.
#[derive(Debug, Parser)]
#[command(name = "treasure-map", version)]
struct Cli {
    /// Input map, or `-` to read standard input.
    input: PathBuf,
    /// File receiving the report. Defaults to standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Accept legacy inputs: the last map line wins and placements are not checked.
    #[arg(long)]
    legacy: bool,
    /// Print run statistics to standard error.
    #[arg(long)]
    stats: bool,
    /// Layout of the statistics printed by `--stats`.
    #[arg(long, value_enum, default_value_t = StatsFormat::Text)]
    stats_format: StatsFormat,
    /// Print every adventurer's journal as JSON to standard error.
    #[arg(long)]
    journal: bool,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StatsFormat {
    /// One human-readable line per counter.
    Text,
    /// A single JSON object.
    Json,
}

/// Entry point for the treasure map command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let text = read_input(&cli.input)?;
    let dialect = if cli.legacy {
        Dialect::Legacy
    } else {
        Dialect::Strict
    };
    let scenario = format::parse_with(&text, dialect)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;
    info!(
        width = scenario.map.width(),
        height = scenario.map.height(),
        mountains = scenario.mountains.len(),
        treasures = scenario.treasures.len(),
        adventurers = scenario.adventurers.len(),
        "map loaded"
    );

    let mut analytics = Analytics::new();
    let scenario = simulate_with(scenario, |events| analytics.handle(events));

    write_output(cli.output.as_deref(), &scenario)?;

    if cli.stats {
        match cli.stats_format {
            StatsFormat::Text => eprintln!("{}", analytics.report()),
            StatsFormat::Json => {
                let json = serde_json::to_string(analytics.report())
                    .context("failed to encode statistics")?;
                eprintln!("{json}");
            }
        }
    }
    if cli.journal {
        let json = journal::encode(&scenario).context("failed to encode journals")?;
        eprintln!("{json}");
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        let _ = io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    debug!(path = %path.display(), "reading map");
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, scenario: &Scenario) -> Result<()> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            format::write_scenario(scenario, io::BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            format::write_scenario(scenario, io::stdout().lock())
                .context("failed to write report")?;
        }
    }
    Ok(())
}
