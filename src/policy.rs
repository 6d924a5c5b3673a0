//! Selection policy: which tiers and files are compared, and how.
//!
//! A policy is plain serde data, so it can be written by hand as TOML:
//!
//! ```
//! use accord::policy::{SelectionPolicy, SourceScope};
//! use accord::naming::MatchingMode;
//!
//! let policy = SelectionPolicy::from_toml_str(r#"
//!     scope = "across_files"
//!     tier_matching = "same_name"
//!     file_matching = "prefix"
//!     file_separators = "_"
//!     selected_tiers = ["gesture"]
//!     files = ["s1_R1.json", "s1_R2.json"]
//!     overlap = 60
//! "#).unwrap();
//! assert_eq!(policy.scope, SourceScope::AcrossFiles);
//! assert_eq!(policy.tier_matching, MatchingMode::SameName);
//! assert!((policy.overlap.value() - 0.6).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::naming::{MatchingMode, NameMatcher};

// =============================================================================
// Thresholds
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdSetting {
    Percent(u32),
    Fraction(f64),
}

/// Minimal overlap ratio for a pairwise match, in `(0.5, 1.0]`.
///
/// Above one half, a segment can never qualify against two disjoint
/// counterparts, which keeps the greedy matching one-to-one by construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "ThresholdSetting", into = "f64")]
pub struct OverlapThreshold(f64);

impl OverlapThreshold {
    /// Validate a ratio.
    pub fn new(value: f64) -> std::result::Result<Self, ConfigError> {
        if value > 0.5 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::ThresholdOutOfRange(value))
        }
    }

    /// Validate a whole percentage, 51 to 100.
    pub fn from_percent(percent: u32) -> std::result::Result<Self, ConfigError> {
        if (51..=100).contains(&percent) {
            Ok(Self(f64::from(percent) / 100.0))
        } else {
            Err(ConfigError::ThresholdOutOfRange(f64::from(percent)))
        }
    }

    /// The ratio.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded percentage, as shown in reports.
    #[must_use]
    pub fn percent(self) -> i64 {
        (self.0 * 100.0).round() as i64
    }
}

impl Default for OverlapThreshold {
    fn default() -> Self {
        Self(0.6)
    }
}

impl TryFrom<ThresholdSetting> for OverlapThreshold {
    type Error = ConfigError;

    fn try_from(setting: ThresholdSetting) -> std::result::Result<Self, ConfigError> {
        match setting {
            ThresholdSetting::Percent(p) => Self::from_percent(p),
            ThresholdSetting::Fraction(f) => Self::new(f),
        }
    }
}

impl From<OverlapThreshold> for f64 {
    fn from(t: OverlapThreshold) -> f64 {
        t.0
    }
}

impl fmt::Display for OverlapThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Preferred mean overlap ratio for joining a multi-rater cluster, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "ThresholdSetting", into = "f64")]
pub struct AverageThreshold(f64);

impl AverageThreshold {
    /// Validate a ratio.
    pub fn new(value: f64) -> std::result::Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::AverageThresholdOutOfRange(value))
        }
    }

    /// Validate a whole percentage, 0 to 100.
    pub fn from_percent(percent: u32) -> std::result::Result<Self, ConfigError> {
        Self::new(f64::from(percent) / 100.0)
    }

    /// The ratio.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded percentage, as shown in reports.
    #[must_use]
    pub fn percent(self) -> i64 {
        (self.0 * 100.0).round() as i64
    }
}

impl Default for AverageThreshold {
    fn default() -> Self {
        Self(0.6)
    }
}

impl TryFrom<ThresholdSetting> for AverageThreshold {
    type Error = ConfigError;

    fn try_from(setting: ThresholdSetting) -> std::result::Result<Self, ConfigError> {
        match setting {
            ThresholdSetting::Percent(p) => Self::from_percent(p),
            ThresholdSetting::Fraction(f) => Self::new(f),
        }
    }
}

impl From<AverageThreshold> for f64 {
    fn from(t: AverageThreshold) -> f64 {
        t.0
    }
}

// =============================================================================
// Policy axes
// =============================================================================

/// Where the tiers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceScope {
    /// Tiers of the single document supplied by the caller.
    #[default]
    CurrentDocument,
    /// Tiers co-located in each selected file.
    SameFile,
    /// Tiers spread over files grouped by a file name affix.
    AcrossFiles,
}

/// How files are grouped for [`SourceScope::AcrossFiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FileMatching {
    /// Files sharing the part of their name before the last separator.
    Prefix,
    /// Files sharing the part of their name after the first separator.
    Suffix,
}

impl From<FileMatching> for MatchingMode {
    fn from(m: FileMatching) -> Self {
        match m {
            FileMatching::Prefix => MatchingMode::Prefix,
            FileMatching::Suffix => MatchingMode::Suffix,
        }
    }
}

// =============================================================================
// SelectionPolicy
// =============================================================================

/// Everything the combination builder and the matchers need to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Source of the tiers.
    pub scope: SourceScope,
    /// Tier grouping.
    pub tier_matching: MatchingMode,
    /// File grouping, required across files.
    pub file_matching: Option<FileMatching>,
    /// Separator characters for tier names; default is any non-alphanumeric character.
    pub tier_separators: Option<String>,
    /// Separator characters for file names.
    pub file_separators: Option<String>,
    /// First (row) tier of a manual pair.
    pub first_tier: Option<String>,
    /// Second (column) tier of a manual pair.
    pub second_tier: Option<String>,
    /// Selected tier names or seeds.
    pub selected_tiers: Vec<String>,
    /// Files to load for the file scopes.
    pub files: Vec<String>,
    /// Compare groups of two or more tiers with Fleiss' kappa instead of pairs.
    pub group_wise: bool,
    /// Minimal overlap for pairwise matches.
    pub overlap: OverlapThreshold,
    /// Preferred mean overlap for multi-rater clusters.
    pub average_overlap: AverageThreshold,
    /// Add per tier pair totals and per combination results to the report.
    pub per_tier_pair: bool,
    /// Add the rating matrices to the multi-rater report.
    pub include_tables: bool,
}

impl SelectionPolicy {
    /// Create a default policy (current document, manual pair, 60% overlap).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML policy.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read a TOML policy file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Set the source scope.
    #[must_use]
    pub fn with_scope(mut self, scope: SourceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the tier matching mode.
    #[must_use]
    pub fn with_tier_matching(mut self, mode: MatchingMode) -> Self {
        self.tier_matching = mode;
        self
    }

    /// Set the file matching mode.
    #[must_use]
    pub fn with_file_matching(mut self, mode: FileMatching) -> Self {
        self.file_matching = Some(mode);
        self
    }

    /// Set tier separator characters.
    #[must_use]
    pub fn with_tier_separators(mut self, separators: impl Into<String>) -> Self {
        self.tier_separators = Some(separators.into());
        self
    }

    /// Set file separator characters.
    #[must_use]
    pub fn with_file_separators(mut self, separators: impl Into<String>) -> Self {
        self.file_separators = Some(separators.into());
        self
    }

    /// Set the manual pair.
    #[must_use]
    pub fn with_tier_pair(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first_tier = Some(first.into());
        self.second_tier = Some(second.into());
        self
    }

    /// Set the selected tier names.
    #[must_use]
    pub fn with_selected_tiers<I, S>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tiers = tiers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the files.
    #[must_use]
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Enable group-wise (multi-rater) comparison.
    #[must_use]
    pub fn with_group_wise(mut self, group_wise: bool) -> Self {
        self.group_wise = group_wise;
        self
    }

    /// Set the pairwise overlap threshold.
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapThreshold) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the multi-rater average overlap threshold.
    #[must_use]
    pub fn with_average_overlap(mut self, overlap: AverageThreshold) -> Self {
        self.average_overlap = overlap;
        self
    }

    /// Enable per tier pair output.
    #[must_use]
    pub fn with_per_tier_pair(mut self, enabled: bool) -> Self {
        self.per_tier_pair = enabled;
        self
    }

    /// Enable matrix output for groups.
    #[must_use]
    pub fn with_tables(mut self, enabled: bool) -> Self {
        self.include_tables = enabled;
        self
    }

    /// Matcher for tier names.
    #[must_use]
    pub fn tier_matcher(&self) -> NameMatcher {
        let m = NameMatcher::new(self.tier_matching);
        match &self.tier_separators {
            Some(s) => m.with_separators(s.clone()),
            None => m,
        }
    }

    /// Matcher for file names, if file matching is configured.
    #[must_use]
    pub fn file_matcher(&self) -> Option<NameMatcher> {
        self.file_matching.map(|mode| {
            let m = NameMatcher::new(mode.into());
            match &self.file_separators {
                Some(s) => m.with_separators(s.clone()),
                None => m,
            }
        })
    }
}
