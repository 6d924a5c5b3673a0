//! Grouping of tier and file names by naming convention.
//!
//! Annotators usually mark their copy of a tier with an affix: `speakerA-R1`
//! and `speakerA-R2`, or `R1_gesture` and `R2_gesture`. The matching mode
//! names the part the tiers *share*:
//!
//! - `Prefix`: the stem is everything before the last separator
//! - `Suffix`: the stem is everything after the first separator
//!
//! A name without a separator is its own stem, so a seed may be a bare stem
//! or any full member name.
//!
//! ```
//! use accord::naming::{MatchingMode, NameMatcher};
//!
//! let names = vec!["speakerA-ref".to_string(), "speakerA-IPA".to_string(), "speakerB-ref".to_string()];
//! let groups = NameMatcher::new(MatchingMode::Prefix)
//!     .with_separators("-")
//!     .group(&names, &["speakerA".to_string()]);
//! assert_eq!(groups, vec![vec!["speakerA-ref".to_string(), "speakerA-IPA".to_string()]]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// How names are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MatchingMode {
    /// The selected names form the only group.
    #[default]
    Manual,
    /// Names sharing the part before the last separator.
    Prefix,
    /// Names sharing the part after the first separator.
    Suffix,
    /// Identical names.
    SameName,
}

impl MatchingMode {
    /// Whether this mode strips an affix.
    #[must_use]
    pub fn is_affix(self) -> bool {
        matches!(self, Self::Prefix | Self::Suffix)
    }
}

impl fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manual => "manual",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::SameName => "same name",
        })
    }
}

/// Groups names according to a [`MatchingMode`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameMatcher {
    mode: MatchingMode,
    separators: Option<String>,
}

impl NameMatcher {
    /// Create a matcher using the default separator rule (any non-alphanumeric character).
    #[must_use]
    pub fn new(mode: MatchingMode) -> Self {
        Self {
            mode,
            separators: None,
        }
    }

    /// Use a custom set of separator characters. An empty string restores the default.
    #[must_use]
    pub fn with_separators(mut self, separators: impl Into<String>) -> Self {
        let separators = separators.into();
        self.separators = (!separators.is_empty()).then_some(separators);
        self
    }

    /// The mode.
    #[must_use]
    pub fn mode(&self) -> MatchingMode {
        self.mode
    }

    fn is_separator(&self, c: char) -> bool {
        match &self.separators {
            Some(set) => set.contains(c),
            None => !c.is_alphanumeric(),
        }
    }

    /// The shared part of a name under this matcher's mode.
    #[must_use]
    pub fn stem<'a>(&self, name: &'a str) -> &'a str {
        match self.mode {
            MatchingMode::Prefix => match name.char_indices().rev().find(|&(_, c)| self.is_separator(c)) {
                Some((idx, _)) => &name[..idx],
                None => name,
            },
            MatchingMode::Suffix => match name.char_indices().find(|&(_, c)| self.is_separator(c)) {
                Some((idx, c)) => &name[idx + c.len_utf8()..],
                None => name,
            },
            MatchingMode::Manual | MatchingMode::SameName => name,
        }
    }

    /// Group `available` names around the `seeds`.
    ///
    /// Groups are ordered by stem; members keep the order of `available`.
    /// Duplicate names are kept once per group except in `SameName` mode, where
    /// every occurrence counts.
    #[must_use]
    pub fn group(&self, available: &[String], seeds: &[String]) -> Vec<Vec<String>> {
        match self.mode {
            MatchingMode::Manual => {
                let mut group: Vec<String> = Vec::new();
                for seed in seeds {
                    if !available.contains(seed) {
                        log::warn!("Selected name \"{}\" is not available, ignored", seed);
                    } else if !group.contains(seed) {
                        group.push(seed.clone());
                    }
                }
                if group.is_empty() {
                    Vec::new()
                } else {
                    vec![group]
                }
            }
            MatchingMode::SameName => {
                let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
                for seed in seeds {
                    groups.entry(seed.as_str()).or_default();
                }
                for name in available {
                    if let Some(members) = groups.get_mut(name.as_str()) {
                        members.push(name.clone());
                    }
                }
                groups.into_values().filter(|g| !g.is_empty()).collect()
            }
            MatchingMode::Prefix | MatchingMode::Suffix => {
                let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
                for seed in seeds {
                    groups.entry(self.stem(seed)).or_default();
                }
                for name in available {
                    if let Some(members) = groups.get_mut(self.stem(name)) {
                        if !members.contains(name) {
                            members.push(name.clone());
                        }
                    }
                }
                groups.into_values().filter(|g| !g.is_empty()).collect()
            }
        }
    }

    /// Group file paths by the stem of their file name (extension removed).
    ///
    /// Every path is its own seed, so every path lands in exactly one group.
    #[must_use]
    pub fn group_files(&self, paths: &[String]) -> Vec<Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in paths {
            let stem = self.stem(file_stem(path)).to_string();
            let members = groups.entry(stem).or_default();
            if !members.contains(path) {
                members.push(path.clone());
            }
        }
        groups.into_values().collect()
    }
}

/// File name without directory and extension.
#[must_use]
pub fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}
