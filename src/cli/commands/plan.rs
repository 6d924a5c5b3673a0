//! Plan command: list combinations without computing agreement

use clap::Parser;
use serde::Serialize;

use super::super::output::write_output;
use super::super::parser::OutputFormat;
use super::SelectionArgs;

use crate::builder::CombinationBuilder;
use crate::diagnostic::Diagnostic;
use crate::progress::{CancellationToken, NoProgress, Progress};
use crate::store::JsonStore;
use accord_core::Combination;

/// List the combinations a policy produces
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Plan<'a> {
    combinations: Vec<PlannedCombination<'a>>,
    diagnostics: &'a [Diagnostic],
    file_count: usize,
    selected_tier_count: usize,
}

#[derive(Serialize)]
struct PlannedCombination<'a> {
    kind: &'static str,
    units: Vec<PlannedUnit<'a>>,
}

#[derive(Serialize)]
struct PlannedUnit<'a> {
    source: &'a str,
    tier: &'a str,
    segments: usize,
}

pub fn run(args: PlanArgs) -> Result<(), String> {
    let policy = args.selection.policy()?;
    let current = args.selection.current_document()?;
    let progress = Progress::new(&NoProgress);
    let built = CombinationBuilder::new(&policy, &JsonStore)
        .build(current.as_ref(), &progress, &CancellationToken::new())
        .map_err(|e| e.to_string())?;

    let content = match args.format {
        OutputFormat::Text => {
            let mut out = format!(
                "{} combinations ({} files, {} selected tiers)\n",
                built.combinations.len(),
                built.file_count,
                built.selected_tier_count
            );
            for (i, c) in built.combinations.iter().enumerate() {
                out.push_str(&format!("{}\t{}\n", i, c.describe()));
            }
            for d in &built.diagnostics {
                out.push_str(&format!("warning: {d}\n"));
            }
            out
        }
        OutputFormat::Json => {
            let plan = Plan {
                combinations: built.combinations.iter().map(planned).collect(),
                diagnostics: &built.diagnostics,
                file_count: built.file_count,
                selected_tier_count: built.selected_tier_count,
            };
            serde_json::to_string_pretty(&plan).map_err(|e| format!("Failed to serialize plan: {}", e))?
        }
    };
    write_output(&content, None)
}

fn planned(c: &Combination) -> PlannedCombination<'_> {
    let kind = match c {
        Combination::Pairwise(_) => "pairwise",
        Combination::MultiRater(_) => "group",
    };
    PlannedCombination {
        kind,
        units: c
            .units()
            .into_iter()
            .map(|u| PlannedUnit {
                source: &u.source,
                tier: &u.tier,
                segments: u.segments.len(),
            })
            .collect(),
    }
}
