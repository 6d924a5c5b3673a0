//! accord - inter-annotator agreement CLI
//!
//! Compares time-aligned annotation tiers and reports modified Cohen's kappa
//! for pairs of tiers, or modified Fleiss' kappa for groups.
//!
//! # Usage
//!
//! ```bash
//! # Two tiers of one document
//! accord compare --current session.json --first gesture_R1 --second gesture_R2
//!
//! # All prefix-matched tier pairs in several files, with per pair totals
//! accord compare --scope same-file --tier-matching prefix -t gesture_R1 \
//!     --file a.json --file b.json --per-tier-pair -o report.txt
//!
//! # Show what would be compared
//! accord plan --config policy.toml
//! ```

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use accord::cli::commands::{compare, plan};
use accord::cli::output::{format_error, init_logging};
use accord::cli::{Cli, Commands};

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result: Result<(), String> = match cli.command {
        Commands::Compare(args) => compare::run(args, cli.quiet),
        Commands::Plan(args) => plan::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "accord", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {}", e);
            eprintln!("{}", format_error("accord", &e));
            ExitCode::FAILURE
        }
    }
}
