//! Cohen-style kappa on square count matrices.
//!
//! `κ = (p₀ − pₑ) / (1 − pₑ)`, with `p₀` the observed agreement (diagonal
//! share) and `pₑ` the agreement expected from the marginals. `κmax` replaces
//! `p₀` by the best diagonal the marginals allow, `Σ min(rowᵢ, colᵢ) / N`.
//! When `pₑ = 1` every rating falls into one category and κ is 1.0; every
//! other zero denominator leaves the coefficient undefined.

use serde::Serialize;
use std::fmt;

use accord_core::Label;

use super::table::{AgreementTable, TwoSquareTable};

// =============================================================================
// Coefficient
// =============================================================================

/// A statistic that may be undefined (division by zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum Coefficient {
    /// A finite value.
    Defined(f64),
    /// The denominator was zero.
    Undefined,
}

impl Coefficient {
    /// `num / den`, undefined when `den` is zero.
    #[must_use]
    pub fn ratio(num: f64, den: f64) -> Self {
        if den == 0.0 {
            Self::Undefined
        } else {
            Self::Defined(num / den)
        }
    }

    /// The value, if defined.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// Whether a value is present.
    #[must_use]
    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

impl From<Coefficient> for Option<f64> {
    fn from(c: Coefficient) -> Self {
        c.value()
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{v:.4}"),
            Self::Undefined => f.write_str("NaN"),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Kappa, its maximum given the marginals, and raw agreement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KappaResult {
    /// Chance-corrected agreement.
    pub kappa: Coefficient,
    /// Largest kappa the marginals allow.
    pub kappa_max: Coefficient,
    /// Observed proportion of agreement.
    pub raw_agreement: Coefficient,
}

impl KappaResult {
    /// All fields undefined.
    pub const UNDEFINED: Self = Self {
        kappa: Coefficient::Undefined,
        kappa_max: Coefficient::Undefined,
        raw_agreement: Coefficient::Undefined,
    };
}

/// Kappa over the whole table and over the matched part only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallAgreement {
    /// With the `Unmatched` row and column.
    pub including: KappaResult,
    /// Without them; undefined below two observed labels.
    pub excluding: KappaResult,
}

/// One-vs-rest agreement for a single label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAgreement {
    /// The category.
    pub label: Label,
    /// Its 2×2 table.
    pub table: TwoSquareTable,
    /// Kappa on the 2×2 table.
    pub result: KappaResult,
}

// =============================================================================
// Computation
// =============================================================================

/// Kappa statistics of a square count matrix.
#[must_use]
pub fn cohen_kappa<R: AsRef<[u64]>>(matrix: &[R]) -> KappaResult {
    let n = matrix.len();
    let total: u64 = matrix.iter().map(|r| r.as_ref().iter().sum::<u64>()).sum();
    if total == 0 {
        return KappaResult::UNDEFINED;
    }

    let rows: Vec<u64> = matrix.iter().map(|r| r.as_ref().iter().sum()).collect();
    let cols: Vec<u64> = (0..n)
        .map(|j| matrix.iter().map(|r| r.as_ref()[j]).sum())
        .collect();
    let diagonal: u64 = (0..n).map(|i| matrix[i].as_ref()[i]).sum();
    let best_diagonal: u64 = (0..n).map(|i| rows[i].min(cols[i])).sum();
    let chance: u128 = (0..n).map(|i| u128::from(rows[i]) * u128::from(cols[i])).sum();
    let squared = u128::from(total) * u128::from(total);

    let n_total = total as f64;
    let p0 = diagonal as f64 / n_total;
    let raw_agreement = Coefficient::Defined(p0);

    if chance == squared {
        return KappaResult {
            kappa: Coefficient::Defined(1.0),
            kappa_max: Coefficient::Defined(1.0),
            raw_agreement,
        };
    }

    let pe = chance as f64 / squared as f64;
    let p_max = best_diagonal as f64 / n_total;
    KappaResult {
        kappa: Coefficient::ratio(p0 - pe, 1.0 - pe),
        kappa_max: Coefficient::ratio(p_max - pe, 1.0 - pe),
        raw_agreement,
    }
}

/// Kappa including and excluding `Unmatched`.
#[must_use]
pub fn overall_agreement(table: &AgreementTable) -> OverallAgreement {
    let including = cohen_kappa(table.counts());
    let (labels, matched) = table.without_unmatched();
    let excluding = if labels.len() < 2 {
        KappaResult::UNDEFINED
    } else {
        cohen_kappa(&matched)
    };
    OverallAgreement {
        including,
        excluding,
    }
}

/// One-vs-rest kappa for every observed label, in label order.
#[must_use]
pub fn category_agreement(table: &AgreementTable) -> Vec<CategoryAgreement> {
    table
        .labels()
        .iter()
        .filter_map(|label| {
            table.two_square(label).map(|tst| CategoryAgreement {
                label: label.clone(),
                result: cohen_kappa(tst.cells()),
                table: tst,
            })
        })
        .collect()
}
