//! Command implementations for the accord CLI
//!
//! `compare` and `plan` share the selection flags in [`SelectionArgs`].

pub mod compare;
pub mod plan;

pub use compare::CompareArgs;
pub use plan::PlanArgs;

use clap::Args;

use super::utils::{parse_average_overlap, parse_overlap, read_document};
use crate::naming::MatchingMode;
use crate::policy::{AverageThreshold, FileMatching, OverlapThreshold, SelectionPolicy, SourceScope};
use accord_core::Document;

/// Which tiers to compare and how. Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// TOML policy file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// The document compared in the current-document scope
    #[arg(long, value_name = "PATH")]
    pub current: Option<String>,

    /// Documents for the same-file and across-files scopes (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Source of the tiers
    #[arg(long, value_enum)]
    pub scope: Option<SourceScope>,

    /// How tiers are grouped
    #[arg(long, value_enum)]
    pub tier_matching: Option<MatchingMode>,

    /// How files are grouped across files
    #[arg(long, value_enum)]
    pub file_matching: Option<FileMatching>,

    /// Separator characters in tier names
    #[arg(long, value_name = "CHARS")]
    pub tier_separators: Option<String>,

    /// Separator characters in file names
    #[arg(long, value_name = "CHARS")]
    pub file_separators: Option<String>,

    /// First tier of a manual pair (rows of the agreement matrix)
    #[arg(long, value_name = "TIER")]
    pub first: Option<String>,

    /// Second tier of a manual pair (columns of the agreement matrix)
    #[arg(long, value_name = "TIER")]
    pub second: Option<String>,

    /// Selected tier name or name seed (repeatable)
    #[arg(short = 't', long = "tier", value_name = "TIER")]
    pub tiers: Vec<String>,

    /// Compare groups of tiers with Fleiss' kappa
    #[arg(short, long)]
    pub group_wise: bool,

    /// Minimal overlap for a pairwise match: percent (51-100) or fraction (0.5, 1]; `1` means 100%
    #[arg(long, value_name = "RATIO", value_parser = parse_overlap)]
    pub overlap: Option<OverlapThreshold>,

    /// Preferred mean overlap within a group cluster: percent or fraction
    #[arg(long, value_name = "RATIO", value_parser = parse_average_overlap)]
    pub average_overlap: Option<AverageThreshold>,

    /// Add totals per tier pair and results per combination
    #[arg(long)]
    pub per_tier_pair: bool,

    /// Add rating matrices to the group report
    #[arg(long)]
    pub tables: bool,
}

impl SelectionArgs {
    /// The policy from `--config`, overridden by explicit flags.
    pub fn policy(&self) -> Result<SelectionPolicy, String> {
        let mut policy = match &self.config {
            Some(path) => SelectionPolicy::from_toml_file(path)
                .map_err(|e| format!("Failed to read config {}: {}", path, e))?,
            None => SelectionPolicy::new(),
        };
        if let Some(scope) = self.scope {
            policy = policy.with_scope(scope);
        } else if self.config.is_none() && !self.files.is_empty() && self.current.is_none() {
            policy = policy.with_scope(SourceScope::SameFile);
        }
        if let Some(mode) = self.tier_matching {
            policy = policy.with_tier_matching(mode);
        }
        if let Some(mode) = self.file_matching {
            policy = policy.with_file_matching(mode);
        }
        if let Some(s) = &self.tier_separators {
            policy = policy.with_tier_separators(s.clone());
        }
        if let Some(s) = &self.file_separators {
            policy = policy.with_file_separators(s.clone());
        }
        if let Some(first) = &self.first {
            policy.first_tier = Some(first.clone());
        }
        if let Some(second) = &self.second {
            policy.second_tier = Some(second.clone());
        }
        if !self.tiers.is_empty() {
            policy = policy.with_selected_tiers(self.tiers.iter().cloned());
        }
        if !self.files.is_empty() {
            policy = policy.with_files(self.files.iter().cloned());
        }
        if self.group_wise {
            policy = policy.with_group_wise(true);
        }
        if let Some(t) = self.overlap {
            policy = policy.with_overlap(t);
        }
        if let Some(t) = self.average_overlap {
            policy = policy.with_average_overlap(t);
        }
        if self.per_tier_pair {
            policy = policy.with_per_tier_pair(true);
        }
        if self.tables {
            policy = policy.with_tables(true);
        }
        Ok(policy)
    }

    /// The current document, if one was named.
    pub fn current_document(&self) -> Result<Option<Document>, String> {
        self.current.as_deref().map(read_document).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(
            &path,
            "scope = \"same_file\"\ntier_matching = \"prefix\"\nselected_tiers = [\"g\"]\noverlap = 70\n",
        )
        .unwrap();
        let args = SelectionArgs {
            config: Some(path.to_string_lossy().into_owned()),
            overlap: Some(OverlapThreshold::from_percent(90).unwrap()),
            ..SelectionArgs::default()
        };
        let policy = args.policy().unwrap();
        assert_eq!(policy.scope, SourceScope::SameFile);
        assert_eq!(policy.tier_matching, MatchingMode::Prefix);
        assert_eq!(policy.overlap.percent(), 90);
        assert_eq!(policy.selected_tiers, ["g"]);
    }

    #[test]
    fn files_without_current_imply_same_file() {
        let args = SelectionArgs {
            files: vec!["a.json".into()],
            ..SelectionArgs::default()
        };
        assert_eq!(args.policy().unwrap().scope, SourceScope::SameFile);
    }
}
