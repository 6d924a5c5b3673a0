//! Overlap ratio between two segments.

use accord_core::Segment;

/// `overlap / longer duration`, in `[0, 1]`. Zero when either segment has no
/// duration. With the longer duration as reference, a ratio above one half
/// can only be reached by one counterpart among disjoint segments.
#[must_use]
pub fn overlap_ratio(a: &Segment, b: &Segment) -> f64 {
    let reference = a.duration().max(b.duration());
    if reference == 0 {
        return 0.0;
    }
    a.overlap(b) as f64 / reference as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(b: u64, e: u64) -> Segment {
        Segment::new("x", b, e).unwrap()
    }

    #[test]
    fn ratio_uses_longer_duration() {
        // 5 of 10 shared; the short one lies fully inside the long one
        let long = seg(0, 10);
        let short = seg(2, 7);
        assert_eq!(overlap_ratio(&long, &short), 0.5);
        assert_eq!(overlap_ratio(&short, &long), 0.5);
    }

    #[test]
    fn at_most_one_disjoint_counterpart_above_half() {
        let a = seg(0, 100);
        let left = seg(0, 50);
        let right = seg(50, 100);
        assert!(overlap_ratio(&a, &left) <= 0.5);
        assert!(overlap_ratio(&a, &right) <= 0.5);
    }

    #[test]
    fn zero_length_never_overlaps() {
        assert_eq!(overlap_ratio(&seg(5, 5), &seg(5, 5)), 0.0);
        assert_eq!(overlap_ratio(&seg(0, 10), &seg(5, 5)), 0.0);
    }

    #[test]
    fn identical_spans_have_ratio_one() {
        assert_eq!(overlap_ratio(&seg(3, 9), &seg(3, 9)), 1.0);
    }
}
