//! Fleiss-style kappa for groups of raters.
//!
//! Each cluster is a subject rated by every rater of the group: a member's
//! value is its rating, a rater without a member rates `Unmatched`. With
//! `n` raters and `nᵢⱼ` ratings of category `j` for subject `i`:
//!
//! ```text
//! Pᵢ = (Σⱼ nᵢⱼ² − n) / (n (n − 1))     agreement on subject i
//! P̄  = mean of Pᵢ
//! pⱼ = column total / all ratings
//! Pₑ = Σⱼ pⱼ²
//! κ  = (P̄ − Pₑ) / (1 − Pₑ)
//! ```
//!
//! The excluding variant keeps only clusters every rater contributed to and
//! drops the `Unmatched` column.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use accord_core::{Label, MultiRaterCombination};

use super::kappa::{Coefficient, KappaResult};
use crate::diagnostic::Diagnostic;
use crate::matching::Cluster;

/// Subjects × categories rating counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleissMatrix {
    categories: Vec<Label>,
    rows: Vec<Vec<u64>>,
    raters: usize,
}

/// Everything derived from a [`FleissMatrix`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleissStatistics {
    /// `Pᵢ` per subject.
    pub subject_agreement: Vec<Coefficient>,
    /// Ratings per category.
    pub column_totals: Vec<u64>,
    /// `pⱼ` per category.
    pub column_proportions: Vec<Coefficient>,
    /// `P̄`.
    pub mean_agreement: Coefficient,
    /// `Pₑ`.
    pub expected_agreement: Coefficient,
    /// Whether `Pₑ` is exactly 1.
    pub expected_is_one: bool,
    /// κ, κmax analogue and `P̄` as raw agreement.
    pub result: KappaResult,
}

impl FleissMatrix {
    /// Build from an explicit count matrix. Every row must sum to `raters`.
    #[must_use]
    pub fn new(categories: Vec<Label>, rows: Vec<Vec<u64>>, raters: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == categories.len()));
        Self {
            categories,
            rows,
            raters,
        }
    }

    /// Rate every cluster. Categories are the group's permissible values plus
    /// `Unmatched`; a member value outside them counts as `Unmatched` and is
    /// reported once per value and tier. Values are ordered and deduplicated
    /// here whatever the order of `group.values`.
    #[must_use]
    pub fn from_clusters(group: &MultiRaterCombination, clusters: &[Cluster]) -> (Self, Vec<Diagnostic>) {
        let columns: BTreeMap<&str, usize> = group
            .values
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(j, v)| (v, j))
            .collect();
        let mut categories: Vec<Label> = columns.keys().map(|v| Label::observed(*v)).collect();
        categories.push(Label::Unmatched);
        let unmatched = categories.len() - 1;
        let raters = group.units.len();

        let mut unknown: BTreeSet<(String, String)> = BTreeSet::new();
        let mut rows = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let mut row = vec![0u64; categories.len()];
            for (r, unit) in group.units.iter().enumerate() {
                let column = match cluster.member(r) {
                    None => unmatched,
                    Some(i) => {
                        let value = unit.segments[i].label().trim();
                        match columns.get(value) {
                            Some(&j) => j,
                            None => {
                                unknown.insert((value.to_string(), unit.tier.clone()));
                                unmatched
                            }
                        }
                    }
                };
                row[column] += 1;
            }
            rows.push(row);
        }

        let diagnostics = unknown
            .into_iter()
            .map(|(value, tier)| Diagnostic::UnknownValue { value, tier }.logged())
            .collect();
        (Self::new(categories, rows, raters), diagnostics)
    }

    /// Categories, `Unmatched` last in a full matrix.
    #[must_use]
    pub fn categories(&self) -> &[Label] {
        &self.categories
    }

    /// Count rows, one per subject.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Raters per subject.
    #[must_use]
    pub fn raters(&self) -> usize {
        self.raters
    }

    /// Complete subjects only, without the `Unmatched` column.
    #[must_use]
    pub fn excluding_unmatched(&self) -> Self {
        let Some(u) = self.categories.iter().position(Label::is_unmatched) else {
            return self.clone();
        };
        let categories = self
            .categories
            .iter()
            .filter(|c| !c.is_unmatched())
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .filter(|row| row[u] == 0)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(j, _)| j != u)
                    .map(|(_, &n)| n)
                    .collect()
            })
            .collect();
        Self::new(categories, rows, self.raters)
    }

    /// Compute the statistics.
    #[must_use]
    pub fn statistics(&self) -> FleissStatistics {
        let n = self.raters as u64;
        let pairs = n * n.saturating_sub(1);
        let subjects = self.rows.len() as u64;

        let subject_agreement: Vec<Coefficient> = self
            .rows
            .iter()
            .map(|row| {
                let agreeing: u64 = row.iter().map(|&c| c * c.saturating_sub(1)).sum();
                Coefficient::ratio(agreeing as f64, pairs as f64)
            })
            .collect();

        let column_totals: Vec<u64> = (0..self.categories.len())
            .map(|j| self.rows.iter().map(|row| row[j]).sum())
            .collect();
        let total: u64 = column_totals.iter().sum();
        let column_proportions: Vec<Coefficient> = column_totals
            .iter()
            .map(|&t| Coefficient::ratio(t as f64, total as f64))
            .collect();

        if subjects == 0 || total == 0 || pairs == 0 {
            return FleissStatistics {
                subject_agreement,
                column_totals,
                column_proportions,
                mean_agreement: Coefficient::Undefined,
                expected_agreement: Coefficient::Undefined,
                expected_is_one: false,
                result: KappaResult::UNDEFINED,
            };
        }

        let agreeing: u64 = self
            .rows
            .iter()
            .flatten()
            .map(|&c| c * c.saturating_sub(1))
            .sum();
        let attainable: u64 = column_totals
            .iter()
            .map(|&t| {
                let (full, rest) = (t / n, t % n);
                full * pairs + rest * rest.saturating_sub(1)
            })
            .sum();
        let denominator = (subjects * pairs) as f64;
        let p_bar = agreeing as f64 / denominator;
        let p_max = attainable as f64 / denominator;

        let squares: u128 = column_totals.iter().map(|&t| u128::from(t) * u128::from(t)).sum();
        let all = u128::from(total) * u128::from(total);
        let expected_is_one = squares == all;
        let pe = squares as f64 / all as f64;

        let result = if expected_is_one {
            KappaResult {
                kappa: Coefficient::Defined(1.0),
                kappa_max: Coefficient::Defined(1.0),
                raw_agreement: Coefficient::Defined(p_bar),
            }
        } else {
            KappaResult {
                kappa: Coefficient::ratio(p_bar - pe, 1.0 - pe),
                kappa_max: Coefficient::ratio(p_max - pe, 1.0 - pe),
                raw_agreement: Coefficient::Defined(p_bar),
            }
        };

        FleissStatistics {
            subject_agreement,
            column_totals,
            column_proportions,
            mean_agreement: Coefficient::Defined(p_bar),
            expected_agreement: Coefficient::Defined(pe),
            expected_is_one,
            result,
        }
    }
}
