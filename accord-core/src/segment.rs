//! Time-aligned coded intervals and their labels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// Label
// =============================================================================

/// A category in an agreement table.
///
/// `Observed` labels sort lexicographically and always precede `Unmatched`,
/// so the void category is the last row and column of every table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Label {
    /// A value produced by an annotator.
    Observed(String),
    /// No counterpart was found for a segment.
    Unmatched,
}

impl Label {
    /// Create an observed label.
    #[must_use]
    pub fn observed(value: impl Into<String>) -> Self {
        Self::Observed(value.into())
    }

    /// Whether this is the void category.
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched)
    }

    /// The annotation value, if any.
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Observed(v) => Some(v),
            Self::Unmatched => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observed(v) => f.write_str(v),
            Self::Unmatched => f.write_str(crate::UNMATCHED),
        }
    }
}

// =============================================================================
// Segment
// =============================================================================

/// An immutable labeled interval `[begin, end)` in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSegment")]
pub struct Segment {
    label: String,
    begin: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawSegment {
    #[serde(alias = "value")]
    label: String,
    begin: u64,
    end: u64,
}

impl TryFrom<RawSegment> for Segment {
    type Error = Error;

    fn try_from(raw: RawSegment) -> Result<Self> {
        Segment::new(raw.label, raw.begin, raw.end)
    }
}

impl Segment {
    /// Create a segment, rejecting `end < begin`.
    pub fn new(label: impl Into<String>, begin: u64, end: u64) -> Result<Self> {
        let label = label.into();
        if end < begin {
            return Err(Error::InvalidSegment { label, begin, end });
        }
        Ok(Self { label, begin, end })
    }

    /// The annotation value.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Begin time (inclusive).
    #[must_use]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    /// End time (exclusive).
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// `end - begin`.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end - self.begin
    }

    /// Length of the shared part of two half-open intervals; zero when disjoint.
    #[must_use]
    pub fn overlap(&self, other: &Segment) -> u64 {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        end.saturating_sub(begin)
    }
}
