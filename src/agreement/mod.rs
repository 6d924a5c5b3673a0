//! Agreement tables and kappa statistics.
//!
//! ```
//! use accord::agreement::{overall_agreement, AgreementTable, Coefficient};
//! use accord_core::Label;
//!
//! let x = Label::observed("x");
//! let mut table = AgreementTable::new([x.clone()]);
//! table.increment(&x, &x);
//! table.increment(&x, &Label::Unmatched);
//! table.double_matched();
//!
//! let overall = overall_agreement(&table);
//! assert!(overall.including.kappa.is_defined());
//! assert_eq!(overall.excluding.kappa, Coefficient::Undefined);
//! ```

pub mod fleiss;
pub mod kappa;
pub mod table;

pub use fleiss::{FleissMatrix, FleissStatistics};
pub use kappa::{
    category_agreement, cohen_kappa, overall_agreement, CategoryAgreement, Coefficient, KappaResult,
    OverallAgreement,
};
pub use table::{AgreementTable, TwoSquareTable};
