//! # accord-core
//!
//! Core types for accord: the data shared by every crate in the workspace.
//!
//! - **Segments**: `Segment`, `Label` (with the `Unmatched` void category)
//! - **Comparison units**: `CompareUnit`, `PairwiseCombination`, `MultiRaterCombination`
//! - **Document contract**: `Document`, `Tier`, `Vocabulary`
//!
//! ```
//! use accord_core::{Label, Segment};
//!
//! let s = Segment::new("nod", 100, 450).unwrap();
//! assert_eq!(s.duration(), 350);
//! assert!(Label::observed("nod") < Label::Unmatched);
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod segment;
pub mod unit;

pub use document::{Document, Tier, Vocabulary};
pub use error::{Error, Result};
pub use segment::{Label, Segment};
pub use unit::{Combination, CompareUnit, MultiRaterCombination, PairwiseCombination};

/// Display name of the void category.
pub const UNMATCHED: &str = "Unmatched";
