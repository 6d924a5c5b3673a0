//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

/// Inter-annotator agreement for time-aligned annotation tiers
#[derive(Parser, Debug)]
#[command(name = "accord")]
#[command(
    author,
    version,
    about = "Inter-annotator agreement for time-aligned annotation tiers",
    long_about = r#"
accord - agreement between annotators of time-aligned tiers

Segments of two tiers are matched by temporal overlap; the matched and
unmatched labels fill an agreement table from which a modified Cohen's
kappa, its maximum and the raw agreement are computed, globally and per
value. Groups of three or more tiers get a modified Fleiss' kappa.

DOCUMENTS:
  JSON files: {"path": "...", "tiers": [{"name": "...", "annotator": "...",
  "segments": [{"label": "nod", "begin": 0, "end": 450}]}]}

EXAMPLES:
  accord compare --current session.json --first gesture_R1 --second gesture_R2
  accord compare --scope same-file --tier-matching prefix -t gesture --file a.json --file b.json
  accord compare --scope across-files --tier-matching same-name --file-matching prefix \
      --file-separators _ -t gesture --file s1_R1.json --file s1_R2.json --group-wise --tables
  accord plan --config policy.toml
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Errors only, no progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute agreement and write the report
    #[command(visible_alias = "c")]
    Compare(crate::cli::commands::CompareArgs),

    /// List the combinations a policy produces, without computing
    #[command(visible_alias = "p")]
    Plan(crate::cli::commands::PlanArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab separated plain text (default)
    #[default]
    Text,
    /// JSON
    Json,
}
