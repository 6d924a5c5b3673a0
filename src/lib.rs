//! # accord
//!
//! Inter-annotator agreement for time-aligned annotation tiers.
//!
//! - **Selection**: which tiers are compared, within one document or across
//!   files, paired by name affixes ([`SelectionPolicy`], [`CombinationBuilder`])
//! - **Matching**: overlap-based one-to-one matching of two raters and
//!   clustering of three or more ([`matching`])
//! - **Agreement**: labeled agreement tables, modified Cohen's kappa with
//!   κmax and raw agreement, modified Fleiss' kappa ([`agreement`])
//! - **Output**: global and per tier pair aggregation, plain text and JSON
//!   reports ([`report`]), group export ([`export`])
//!
//! ## Quick Start
//!
//! ```rust
//! use accord::{AgreementResults, Engine, MemoryStore, SelectionPolicy};
//! use accord_core::{Document, Segment, Tier};
//!
//! let seg = |l: &str, b, e| Segment::new(l, b, e).unwrap();
//! let doc = Document::new("session.eaf", vec![
//!     Tier::new("gesture_R1", vec![seg("nod", 0, 1000), seg("shake", 2000, 3000)]),
//!     Tier::new("gesture_R2", vec![seg("nod", 100, 1000), seg("nod", 2000, 2900)]),
//! ]);
//!
//! let policy = SelectionPolicy::new().with_tier_pair("gesture_R1", "gesture_R2");
//! let outcome = Engine::new(policy).run(Some(&doc), &MemoryStore::new())?;
//!
//! if let AgreementResults::Pairwise(results) = &outcome.results {
//!     let global = &results.aggregate.global;
//!     println!("kappa = {}", global.overall.including.kappa);
//! }
//! # Ok::<(), accord::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Adds |
//! |---------|------|
//! | `parallel` | combinations computed on the rayon pool |
//! | `cli` | clap parser, commands and terminal progress for the `accord` binary |

#![warn(missing_docs)]

pub mod aggregate;
pub mod agreement;
pub mod analysis;
pub mod builder;
pub mod diagnostic;
pub mod engine;
mod error;
pub mod export;
pub mod matching;
pub mod naming;
pub mod policy;
pub mod progress;
pub mod report;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub mod prelude {
    //! Commonly used items.
    //!
    //! ```rust
    //! use accord::prelude::*;
    //!
    //! let policy = SelectionPolicy::new()
    //!     .with_scope(SourceScope::SameFile)
    //!     .with_tier_matching(MatchingMode::Prefix)
    //!     .with_selected_tiers(["gesture"]);
    //! assert!(policy.tier_matcher().mode().is_affix());
    //! ```
    pub use crate::agreement::{AgreementTable, Coefficient, KappaResult};
    pub use crate::engine::{AgreementResults, ComputeOutcome, Engine};
    pub use crate::error::{ConfigError, Error, Result};
    pub use crate::naming::MatchingMode;
    pub use crate::policy::{AverageThreshold, FileMatching, OverlapThreshold, SelectionPolicy, SourceScope};
    pub use crate::progress::{CancellationToken, ProgressSink};
    pub use crate::store::{DocumentStore, JsonStore, MemoryStore};
    pub use accord_core::{Document, Label, Segment, Tier};
}

// Re-exports
pub use aggregate::{AggregateAnalysis, AggregatedResults, ResultAggregator};
pub use agreement::{
    category_agreement, cohen_kappa, overall_agreement, AgreementTable, CategoryAgreement, Coefficient,
    FleissMatrix, FleissStatistics, KappaResult, OverallAgreement, TwoSquareTable,
};
pub use analysis::{GroupAnalysis, PairwiseAnalysis};
pub use builder::{BuildOutcome, CombinationBuilder};
pub use diagnostic::Diagnostic;
pub use engine::{compute, AgreementResults, ComputeOutcome, Engine, GroupResults, PairwiseResults};
pub use error::{ConfigError, Error, Result};
pub use export::export_groups;
pub use matching::{cluster_segments, match_pairwise, overlap_ratio, Cluster, PairwiseMatches};
pub use naming::{MatchingMode, NameMatcher};
pub use policy::{AverageThreshold, FileMatching, OverlapThreshold, SelectionPolicy, SourceScope};
pub use progress::{CancellationToken, NoProgress, Progress, ProgressSink};
pub use store::{DocumentStore, JsonStore, MemoryStore};

pub use accord_core::{
    Combination, CompareUnit, Document, Label, MultiRaterCombination, PairwiseCombination, Segment, Tier,
    Vocabulary, UNMATCHED,
};
