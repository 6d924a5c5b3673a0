//! Merging per-combination tables into global and per tier pair totals.
//!
//! Kappa is recomputed on the merged counts, never averaged over combinations.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::agreement::{category_agreement, overall_agreement, AgreementTable, CategoryAgreement, OverallAgreement};
use crate::analysis::PairwiseAnalysis;
use crate::error::Result;

/// A merged table and the statistics computed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateAnalysis {
    /// Merged counts.
    pub table: AgreementTable,
    /// Overall kappa.
    pub overall: OverallAgreement,
    /// One-vs-rest kappa per label.
    pub categories: Vec<CategoryAgreement>,
}

impl AggregateAnalysis {
    /// Compute statistics on a table.
    #[must_use]
    pub fn from_table(table: AgreementTable) -> Self {
        Self {
            overall: overall_agreement(&table),
            categories: category_agreement(&table),
            table,
        }
    }
}

/// Accumulates tables; keys of the per tier pair totals are `first:second`.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    global: AgreementTable,
    per_tier_pair: Option<BTreeMap<String, AgreementTable>>,
}

/// Output of [`ResultAggregator::finish`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResults {
    /// Over every combination.
    pub global: AggregateAnalysis,
    /// Per tier pair name, across files; empty unless requested.
    pub per_tier_pair: BTreeMap<String, AggregateAnalysis>,
}

impl ResultAggregator {
    /// Create an aggregator; `per_tier_pair` enables the keyed totals.
    #[must_use]
    pub fn new(per_tier_pair: bool) -> Self {
        Self {
            global: AgreementTable::default(),
            per_tier_pair: per_tier_pair.then(BTreeMap::new),
        }
    }

    /// Merge one table under a tier pair key.
    pub fn add(&mut self, key: &str, table: &AgreementTable) -> Result<()> {
        self.global.merge(table)?;
        if let Some(map) = &mut self.per_tier_pair {
            map.entry(key.to_string()).or_default().merge(table)?;
        }
        Ok(())
    }

    /// Merge a pairwise analysis.
    pub fn add_analysis(&mut self, analysis: &PairwiseAnalysis) -> Result<()> {
        self.add(&analysis.combination.tier_pair_key(), &analysis.table)
    }

    /// Compute statistics on the merged tables.
    #[must_use]
    pub fn finish(self) -> AggregatedResults {
        AggregatedResults {
            global: AggregateAnalysis::from_table(self.global),
            per_tier_pair: self
                .per_tier_pair
                .unwrap_or_default()
                .into_iter()
                .map(|(k, t)| (k, AggregateAnalysis::from_table(t)))
                .collect(),
        }
    }
}
