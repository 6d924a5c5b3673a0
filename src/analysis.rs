//! Per-combination computation: match, tabulate, compute kappa.

use serde::Serialize;

use accord_core::{MultiRaterCombination, PairwiseCombination};

use crate::agreement::{
    category_agreement, overall_agreement, AgreementTable, CategoryAgreement, FleissMatrix, FleissStatistics,
    OverallAgreement,
};
use crate::diagnostic::Diagnostic;
use crate::matching::{cluster_segments, match_pairwise, Cluster, PairwiseMatches};
use crate::policy::{AverageThreshold, OverlapThreshold};

/// Results for one pair of tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseAnalysis {
    /// The compared units.
    pub combination: PairwiseCombination,
    /// Matching outcome.
    pub matches: PairwiseMatches,
    /// Agreement table with matched cells doubled.
    pub table: AgreementTable,
    /// Overall kappa.
    pub overall: OverallAgreement,
    /// One-vs-rest kappa per label.
    pub categories: Vec<CategoryAgreement>,
}

impl PairwiseAnalysis {
    /// Match the two units and compute their agreement.
    #[must_use]
    pub fn compute(combination: PairwiseCombination, threshold: OverlapThreshold) -> Self {
        let first = &combination.first.segments;
        let second = &combination.second.segments;
        let matches = match_pairwise(first, second, threshold);
        let mut table = AgreementTable::from_matches(first, second, &matches);
        table.double_matched();
        let overall = overall_agreement(&table);
        let categories = category_agreement(&table);
        log::debug!(
            "{}:{} matched {} pairs, {} + {} unmatched",
            combination.first.tier,
            combination.second.tier,
            matches.len(),
            matches.unmatched_first.len(),
            matches.unmatched_second.len()
        );
        Self {
            combination,
            matches,
            table,
            overall,
            categories,
        }
    }
}

/// Results for one group of tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAnalysis {
    /// The compared units.
    pub combination: MultiRaterCombination,
    /// Clusters of matching segments.
    pub clusters: Vec<Cluster>,
    /// Rating matrix including `Unmatched`.
    pub including_matrix: FleissMatrix,
    /// Rating matrix of complete clusters, without `Unmatched`.
    pub excluding_matrix: FleissMatrix,
    /// Statistics including `Unmatched`.
    pub including: FleissStatistics,
    /// Statistics excluding `Unmatched`.
    pub excluding: FleissStatistics,
    /// Values outside the permissible set.
    pub diagnostics: Vec<Diagnostic>,
}

impl GroupAnalysis {
    /// Cluster the units and compute Fleiss-style kappa.
    #[must_use]
    pub fn compute(combination: MultiRaterCombination, threshold: AverageThreshold) -> Self {
        let raters: Vec<&[accord_core::Segment]> =
            combination.units.iter().map(|u| u.segments.as_slice()).collect();
        let clusters = cluster_segments(&raters, threshold);
        let (including_matrix, diagnostics) = FleissMatrix::from_clusters(&combination, &clusters);
        let excluding_matrix = including_matrix.excluding_unmatched();
        let including = including_matrix.statistics();
        let excluding = excluding_matrix.statistics();
        log::debug!(
            "Group of {} raters: {} clusters, {} complete",
            combination.units.len(),
            clusters.len(),
            excluding_matrix.rows().len()
        );
        Self {
            combination,
            clusters,
            including_matrix,
            excluding_matrix,
            including,
            excluding,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::Coefficient;
    use accord_core::{CompareUnit, Label, Segment};

    fn unit(tier: &str, segs: &[(&str, u64, u64)]) -> CompareUnit {
        CompareUnit::new(
            "doc",
            tier,
            "",
            segs.iter().map(|&(l, b, e)| Segment::new(l, b, e).unwrap()).collect(),
        )
    }

    #[test]
    fn single_identical_pair() {
        let c = PairwiseCombination::new(unit("a", &[("x", 0, 10)]), unit("b", &[("x", 0, 10)]));
        let r = PairwiseAnalysis::compute(c, OverlapThreshold::new(0.6).unwrap());
        assert_eq!(r.overall.including.kappa, Coefficient::Defined(1.0));
        assert!(r.overall.excluding.kappa.value().is_none());
        assert_eq!(r.table.total(), 2);
    }

    #[test]
    fn unmatched_only() {
        let c = PairwiseCombination::new(unit("a", &[("x", 0, 10)]), unit("b", &[]));
        let r = PairwiseAnalysis::compute(c, OverlapThreshold::default());
        assert_eq!(r.table.get(&Label::observed("x"), &Label::Unmatched), 1);
        assert_eq!(r.table.total(), 1);
        assert!(r.overall.including.kappa.is_defined());
        assert!(!r.overall.excluding.kappa.is_defined());
    }

    #[test]
    fn group_analysis_of_identical_raters() {
        let segs = [("x", 0, 10), ("y", 20, 30)];
        let g = MultiRaterCombination::new(
            vec![unit("r1", &segs), unit("r2", &segs), unit("r3", &segs)],
            None,
            vec!["x".into(), "y".into()],
        );
        let r = GroupAnalysis::compute(g, AverageThreshold::default());
        assert_eq!(r.clusters.len(), 2);
        assert_eq!(r.including.result.kappa, Coefficient::Defined(1.0));
        assert!(r.diagnostics.is_empty());
    }
}
