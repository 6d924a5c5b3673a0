//! Non-fatal findings collected while building and computing combinations.
//!
//! Every skipped tier, file or group produces one `Diagnostic`. They are kept
//! in the order they were raised and logged with `log::warn!` as they occur.

use serde::Serialize;
use std::fmt;

/// A skip or warning with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Diagnostic {
    /// A named tier does not exist in a source.
    MissingTier {
        /// Tier name.
        tier: String,
        /// Source path.
        source: String,
    },
    /// A document could not be loaded.
    UnreadableDocument {
        /// Source path.
        path: String,
        /// Loader message.
        reason: String,
    },
    /// Both tiers of a pair have no segments.
    BothTiersEmpty {
        /// First tier.
        first: String,
        /// Second tier.
        second: String,
    },
    /// A tier without segments was left out of a group.
    EmptyTierInGroup {
        /// Tier name.
        tier: String,
        /// Source path.
        source: String,
    },
    /// A group kept fewer than two non-empty tiers and was discarded.
    TooFewRaters {
        /// Tiers of the discarded group.
        tiers: Vec<String>,
    },
    /// A file matched no other file.
    UnpairedFile {
        /// Source path.
        path: String,
    },
    /// No two files could be grouped by the file name affix.
    NoMatchingFiles,
    /// Best-effort group assignment could not give every tier its own file.
    PartialAssignment {
        /// Files in the match group.
        files: usize,
        /// Tier names requested.
        tiers: usize,
        /// Units actually assigned.
        assigned: usize,
    },
    /// A value outside a group's permissible values, counted as unmatched.
    UnknownValue {
        /// The value.
        value: String,
        /// Tier it occurred on.
        tier: String,
    },
    /// The run was cancelled; later combinations were not computed.
    Cancelled {
        /// Combinations finished.
        completed: usize,
        /// Combinations requested.
        total: usize,
    },
}

impl Diagnostic {
    /// Log the message at warn level and return self.
    #[must_use]
    pub fn logged(self) -> Self {
        log::warn!("{}", self);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTier { tier, source } => {
                write!(f, "The tier \"{tier}\" was not found in \"{source}\", skipped")
            }
            Self::UnreadableDocument { path, reason } => {
                write!(f, "Could not load \"{path}\": {reason}")
            }
            Self::BothTiersEmpty { first, second } => write!(
                f,
                "Both tiers \"{first}\" and \"{second}\" have no annotations, skipped"
            ),
            Self::EmptyTierInGroup { tier, source } => write!(
                f,
                "The tier \"{tier}\" in \"{source}\" has no annotations and is left out of its group"
            ),
            Self::TooFewRaters { tiers } => write!(
                f,
                "Fewer than two tiers with annotations in group [{}], skipped",
                tiers.join(", ")
            ),
            Self::UnpairedFile { path } => {
                write!(f, "No matching file found for \"{path}\", skipped")
            }
            Self::NoMatchingFiles => f.write_str("No matching files could be found"),
            Self::PartialAssignment {
                files,
                tiers,
                assigned,
            } => write!(
                f,
                "{files} matching files for {tiers} tier names, only {assigned} tiers could be assigned to a file"
            ),
            Self::UnknownValue { value, tier } => write!(
                f,
                "The value \"{value}\" of tier \"{tier}\" is not a permissible value, counted as unmatched"
            ),
            Self::Cancelled { completed, total } => write!(
                f,
                "Cancelled after {completed} of {total} combinations, results are partial"
            ),
        }
    }
}
