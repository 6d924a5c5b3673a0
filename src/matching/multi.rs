//! Clustering of segments from three or more raters.
//!
//! All segments are scanned in time order. A segment joins the open cluster
//! whose current members it overlaps best on average, provided that mean
//! meets the threshold and the cluster has no member from the same rater yet;
//! otherwise it opens a cluster of its own. Clusters with a single member are
//! kept: they are the disagreements.

use serde::Serialize;

use accord_core::Segment;

use super::overlap::overlap_ratio;
use crate::policy::AverageThreshold;

/// Segments judged to denote the same event, at most one per rater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Per rater, the index of its member segment.
    members: Vec<Option<usize>>,
}

impl Cluster {
    fn new(raters: usize) -> Self {
        Self {
            members: vec![None; raters],
        }
    }

    /// Member segment index of `rater`, if any.
    #[must_use]
    pub fn member(&self, rater: usize) -> Option<usize> {
        self.members.get(rater).copied().flatten()
    }

    /// Per rater member indices.
    #[must_use]
    pub fn members(&self) -> &[Option<usize>] {
        &self.members
    }

    /// Number of raters with a member.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.iter().filter(|m| m.is_some()).count()
    }

    /// Whether no rater has a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of raters without a member.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.members.len() - self.len()
    }

    /// Member segments as `(rater, segment)`.
    pub fn segments<'a, S: AsRef<[Segment]>>(
        &'a self,
        raters: &'a [S],
    ) -> impl Iterator<Item = (usize, &'a Segment)> + 'a {
        self.members
            .iter()
            .enumerate()
            .filter_map(move |(r, m)| m.map(|i| (r, &raters[r].as_ref()[i])))
    }
}

/// Cluster the segments of `raters` (one segment list per rater).
///
/// Scan order is begin, end, rater index, list index. A cluster stays open
/// while its extent ends after the scanned segment's begin. Among admissible
/// clusters the highest mean ratio wins; ties go to the earliest opened. A
/// segment must overlap at least one member to join. Clusters are returned in
/// the order they were opened.
#[must_use]
pub fn cluster_segments<S: AsRef<[Segment]>>(raters: &[S], threshold: AverageThreshold) -> Vec<Cluster> {
    let t = threshold.value();
    let mut entries: Vec<(usize, usize)> = raters
        .iter()
        .enumerate()
        .flat_map(|(r, segs)| (0..segs.as_ref().len()).map(move |i| (r, i)))
        .collect();
    entries.sort_by_key(|&(r, i)| {
        let s = &raters[r].as_ref()[i];
        (s.begin(), s.end(), r, i)
    });

    let mut clusters: Vec<Cluster> = Vec::new();
    let mut extent_end: Vec<u64> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for (r, i) in entries {
        let seg = &raters[r].as_ref()[i];
        open.retain(|&c| extent_end[c] > seg.begin());

        let mut best: Option<(usize, f64)> = None;
        for &c in &open {
            if clusters[c].member(r).is_some() {
                continue;
            }
            let (sum, count) = clusters[c]
                .segments(raters)
                .fold((0.0, 0usize), |(sum, n), (_, m)| (sum + overlap_ratio(seg, m), n + 1));
            if count == 0 {
                continue;
            }
            let mean = sum / count as f64;
            if mean > 0.0 && mean >= t && best.map_or(true, |(_, b)| mean > b) {
                best = Some((c, mean));
            }
        }

        let c = match best {
            Some((c, _)) => c,
            None => {
                clusters.push(Cluster::new(raters.len()));
                extent_end.push(seg.end());
                open.push(clusters.len() - 1);
                clusters.len() - 1
            }
        };
        clusters[c].members[r] = Some(i);
        extent_end[c] = extent_end[c].max(seg.end());
    }

    log::debug!(
        "Clustered {} raters into {} clusters",
        raters.len(),
        clusters.len()
    );
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(b: u64, e: u64) -> Segment {
        Segment::new("x", b, e).unwrap()
    }

    fn avg(v: f64) -> AverageThreshold {
        AverageThreshold::new(v).unwrap()
    }

    #[test]
    fn identical_raters_form_full_clusters() {
        let r = vec![seg(0, 10), seg(20, 30)];
        let raters = vec![r.clone(), r.clone(), r];
        let clusters = cluster_segments(&raters, avg(1.0));
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.len() == 3));
        assert_eq!(clusters[0].members(), &[Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn poor_overlap_opens_new_cluster() {
        let raters = vec![vec![seg(0, 100)], vec![seg(80, 180)], vec![seg(0, 90)]];
        let clusters = cluster_segments(&raters, avg(0.6));
        // rater 2 joins rater 0 (0.9); rater 1 overlaps 0.2 / 0.1
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members(), &[Some(0), None, Some(0)]);
        assert_eq!(clusters[1].members(), &[None, Some(0), None]);
        assert_eq!(clusters[1].missing(), 2);
    }

    #[test]
    fn one_member_per_rater() {
        let raters = vec![vec![seg(0, 10), seg(0, 10)], vec![seg(0, 10)]];
        let clusters = cluster_segments(&raters, avg(0.5));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members(), &[Some(0), Some(0)]);
        assert_eq!(clusters[1].members(), &[Some(1), None]);
    }

    #[test]
    fn mean_is_over_current_members() {
        let raters = vec![vec![seg(0, 100)], vec![seg(0, 60)], vec![seg(0, 100)]];
        // scan order r1, r0, r2; r0 joins r1 at 0.6, r2 then averages (0.6 + 1.0) / 2
        assert_eq!(cluster_segments(&raters, avg(0.6)).len(), 1);
        // r0 cannot join r1, r2 joins r0
        let clusters = cluster_segments(&raters, avg(0.8));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[1].members(), &[Some(0), None, Some(0)]);
    }

    #[test]
    fn zero_threshold_still_needs_overlap() {
        let raters = vec![vec![seg(0, 10)], vec![seg(10, 20)]];
        assert_eq!(cluster_segments(&raters, avg(0.0)).len(), 2);
    }

    #[test]
    fn empty_input() {
        let raters: Vec<Vec<Segment>> = vec![vec![], vec![]];
        assert!(cluster_segments(&raters, avg(0.6)).is_empty());
    }
}
