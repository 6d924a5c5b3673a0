//! Comparison units and the combinations built from them.

use serde::{Deserialize, Serialize};

use crate::document::Tier;
use crate::segment::Segment;

/// One rater's output for one tier of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareUnit {
    /// Path or identifier of the source document.
    pub source: String,
    /// Tier name.
    pub tier: String,
    /// Annotator identifier; may be empty.
    pub annotator: String,
    /// Segments in time order.
    pub segments: Vec<Segment>,
}

impl CompareUnit {
    /// Create a unit.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        tier: impl Into<String>,
        annotator: impl Into<String>,
        segments: Vec<Segment>,
    ) -> Self {
        Self {
            source: source.into(),
            tier: tier.into(),
            annotator: annotator.into(),
            segments,
        }
    }

    /// Snapshot a tier of the given source.
    #[must_use]
    pub fn from_tier(source: &str, tier: &Tier) -> Self {
        Self::new(source, &tier.name, &tier.annotator, tier.segments.clone())
    }

    /// Whether the unit has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// File name part of the source, for display.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.source
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.source.as_str())
    }
}

/// Two units compared with each other: `first` is the row axis, `second` the column axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseCombination {
    /// Row rater.
    pub first: CompareUnit,
    /// Column rater.
    pub second: CompareUnit,
}

impl PairwiseCombination {
    /// Create a pairwise combination.
    #[must_use]
    pub fn new(first: CompareUnit, second: CompareUnit) -> Self {
        Self { first, second }
    }

    /// Tier-pair key used for per-tier-pair aggregation (`first:second`).
    #[must_use]
    pub fn tier_pair_key(&self) -> String {
        format!("{}:{}", self.first.tier, self.second.tier)
    }
}

/// Two or more units compared as a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRaterCombination {
    /// Raters, in assignment order.
    pub units: Vec<CompareUnit>,
    /// Comma-joined names of the vocabularies involved, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_name: Option<String>,
    /// Permissible values, sorted and distinct.
    #[serde(default)]
    pub values: Vec<String>,
}

impl MultiRaterCombination {
    /// Create a group; values are sorted and de-duplicated.
    #[must_use]
    pub fn new(units: Vec<CompareUnit>, vocabulary_name: Option<String>, mut values: Vec<String>) -> Self {
        values.sort();
        values.dedup();
        Self {
            units,
            vocabulary_name,
            values,
        }
    }

    /// Number of raters.
    #[must_use]
    pub fn rater_count(&self) -> usize {
        self.units.len()
    }
}

/// A unit of work for the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Combination {
    /// Two raters.
    Pairwise(PairwiseCombination),
    /// A group of raters.
    MultiRater(MultiRaterCombination),
}

impl Combination {
    /// All units, in order.
    #[must_use]
    pub fn units(&self) -> Vec<&CompareUnit> {
        match self {
            Self::Pairwise(p) => vec![&p.first, &p.second],
            Self::MultiRater(m) => m.units.iter().collect(),
        }
    }

    /// Short human description: `tier (file) <> tier (file)`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.units()
            .iter()
            .map(|u| format!("{} ({})", u.tier, u.file_name()))
            .collect::<Vec<_>>()
            .join(" <> ")
    }
}
