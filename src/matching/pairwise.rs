//! Greedy one-to-one matching of two segmentations.
//!
//! Segments of the first unit are visited in ascending begin order (stable).
//! Each takes the still unused segment of the second unit with the highest
//! overlap ratio at or above the threshold; ties go to the earlier begin,
//! then to list order. Choices are never revisited, so the result is not a
//! global maximum-weight matching.

use serde::Serialize;

use accord_core::Segment;

use super::overlap::overlap_ratio;
use crate::policy::OverlapThreshold;

/// Outcome of matching two segment lists, as indices into those lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PairwiseMatches {
    /// `(first index, second index)` in the order matches were committed.
    pub pairs: Vec<(usize, usize)>,
    /// First-unit segments without a counterpart, in list order.
    pub unmatched_first: Vec<usize>,
    /// Second-unit segments without a counterpart, in list order.
    pub unmatched_second: Vec<usize>,
}

impl PairwiseMatches {
    /// Number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Match `first` against `second`.
#[must_use]
pub fn match_pairwise(first: &[Segment], second: &[Segment], threshold: OverlapThreshold) -> PairwiseMatches {
    let t = threshold.value();
    let mut order: Vec<usize> = (0..first.len()).collect();
    order.sort_by_key(|&i| first[i].begin());

    let mut used_first = vec![false; first.len()];
    let mut used_second = vec![false; second.len()];
    let mut pairs = Vec::new();

    for i in order {
        let a = &first[i];
        let mut best: Option<(usize, f64)> = None;
        for (j, b) in second.iter().enumerate() {
            if used_second[j] {
                continue;
            }
            let r = overlap_ratio(a, b);
            if r < t {
                continue;
            }
            let better = match best {
                None => true,
                Some((k, best_r)) => r > best_r || (r == best_r && b.begin() < second[k].begin()),
            };
            if better {
                best = Some((j, r));
            }
        }
        if let Some((j, _)) = best {
            used_first[i] = true;
            used_second[j] = true;
            pairs.push((i, j));
        }
    }

    PairwiseMatches {
        pairs,
        unmatched_first: unused(&used_first),
        unmatched_second: unused(&used_second),
    }
}

fn unused(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter_map(|(i, &u)| (!u).then_some(i))
        .collect()
}
