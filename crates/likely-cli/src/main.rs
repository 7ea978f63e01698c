use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use likely_core::{Aggregator, TraceEvent};

mod demo;

/// likely: dynamic likely-invariant inference
///
/// Feed call/return trace events to the engine and print the
/// invariants it inferred as human-readable assertions.
#[derive(Parser)]
#[command(name = "likely", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer invariants from a JSONL trace file (one event per line)
    Infer {
        /// Path to trace file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trace a built-in sample program and infer its invariants
    Demo {
        /// Sample program to trace
        #[arg(long, value_enum, default_value = "double")]
        program: demo::Program,
        /// Comma-separated input values
        #[arg(long, default_value = "3,0,-10", allow_hyphen_values = true)]
        inputs: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the SHA-256 digest of the report inferred from a trace
    Digest {
        /// Path to trace file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Infer { file, json } => match ingest(&file) {
            Ok(agg) => print_report(&agg, json),
            Err(msg) => fail(&msg),
        },
        Commands::Demo {
            program,
            inputs,
            json,
        } => match demo::parse_inputs(&inputs).and_then(|values| demo::run(program, &values)) {
            Ok(agg) => print_report(&agg, json),
            Err(msg) => fail(&msg),
        },
        Commands::Digest { file } => match ingest(&file) {
            Ok(agg) => {
                println!("{}", agg.report().digest());
                0
            }
            Err(msg) => fail(&msg),
        },
        Commands::Version => {
            println!(
                "likely {} (likely-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            0
        }
    };

    process::exit(exit_code);
}

/// Read a JSONL trace and fold every event into a fresh aggregator.
/// A malformed line is fatal; an incomparable observation is reported
/// on stderr and the rest of the trace still lands.
fn ingest(file: &Path) -> Result<Aggregator, String> {
    let text = fs::read_to_string(file).map_err(|e| format!("{}: {}", file.display(), e))?;
    let mut agg = Aggregator::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = TraceEvent::from_json_line(line)
            .map_err(|e| format!("{}:{}: {}", file.display(), idx + 1, e))?;
        if let Err(e) = agg.record_event(&event) {
            eprintln!(
                "{} {}:{}: {}",
                "warning:".yellow().bold(),
                file.display(),
                idx + 1,
                e
            );
        }
    }
    Ok(agg)
}

fn print_report(agg: &Aggregator, json: bool) -> i32 {
    let report = agg.report();
    if report.is_empty() {
        eprintln!("{}", "no call/return events observed".yellow());
        return 1;
    }
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => return fail(&format!("serializing report: {}", e)),
        }
    } else {
        for line in report.to_string().lines() {
            if line.ends_with(':') && !line.starts_with(' ') {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }
    0
}

fn fail(msg: &str) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), msg);
    2
}
