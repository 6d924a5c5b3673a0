//! Compare command: compute agreement and write the report

use clap::Parser;
use std::path::Path;
use std::time::Instant;

use super::super::output::{log_info, write_output};
use super::super::parser::OutputFormat;
use super::super::progress::TerminalProgress;
use super::super::utils::now;
use super::SelectionArgs;

use crate::engine::{AgreementResults, Engine};
use crate::export::export_groups;
use crate::progress::{CancellationToken, NoProgress, ProgressSink};
use crate::report::{render_json, render_report};
use crate::store::JsonStore;
use crate::Error;

/// Compute agreement between tiers
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Report format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Write each group of matching tiers as a JSON document below DIR
    #[arg(long, value_name = "DIR")]
    pub export_groups: Option<String>,
}

pub fn run(args: CompareArgs, quiet: bool) -> Result<(), String> {
    let policy = args.selection.policy()?;
    let current = args.selection.current_document()?;

    let bar = TerminalProgress::new(quiet);
    let sink: &dyn ProgressSink = match &bar {
        Some(b) => b,
        None => &NoProgress,
    };

    let start = Instant::now();
    let engine = Engine::new(policy);
    let result = engine.compute(current.as_ref(), &JsonStore, sink, &CancellationToken::new());
    if let Some(b) = &bar {
        b.finish();
    }
    let outcome = result.map_err(|e| match e {
        Error::NothingToCompare(diagnostics) => {
            let mut msg = String::from("There are no segments for the agreement calculation.");
            for d in diagnostics {
                msg.push_str(&format!("\n  {d}"));
            }
            msg
        }
        other => other.to_string(),
    })?;

    let content = match args.format {
        OutputFormat::Text => render_report(&outcome, &now()).map_err(|e| e.to_string())?,
        OutputFormat::Json => render_json(&outcome).map_err(|e| format!("Failed to serialize results: {}", e))?,
    };
    write_output(&content, args.output.as_deref())?;

    if let Some(dir) = &args.export_groups {
        match &outcome.results {
            AgreementResults::Groups(g) => {
                let written = export_groups(Path::new(dir), g.groups.iter().map(|a| &a.combination))
                    .map_err(|e| format!("Failed to export groups to {}: {}", dir, e))?;
                log_info(&format!("Exported {} groups to {}", written.len(), dir), quiet);
            }
            AgreementResults::Pairwise(_) => {
                log_info("--export-groups only applies to group-wise comparisons", quiet);
            }
        }
    }

    log_info(
        &format!(
            "Compared {} of {} combinations in {:.2}ms",
            outcome.completed(),
            outcome.requested,
            start.elapsed().as_secs_f64() * 1000.0
        ),
        quiet,
    );
    Ok(())
}
