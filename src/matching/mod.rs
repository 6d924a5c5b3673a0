//! Temporal matching of segments between raters.
//!
//! - [`pairwise`]: one-to-one greedy matching of two segmentations
//! - [`multi`]: clustering of three or more segmentations
//! - [`overlap`]: the overlap ratio both matchers share

pub mod multi;
pub mod overlap;
pub mod pairwise;

pub use multi::{cluster_segments, Cluster};
pub use overlap::overlap_ratio;
pub use pairwise::{match_pairwise, PairwiseMatches};
