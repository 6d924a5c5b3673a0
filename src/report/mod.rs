//! Text and JSON rendering of a [`ComputeOutcome`].
//!
//! The text layouts are tab separated with four decimals and a `.` decimal
//! point. The creation time is passed in, so a given outcome always renders
//! to the same bytes.
//!
//! ```
//! use accord::{report, Engine, MemoryStore, SelectionPolicy};
//! use accord_core::{Document, Segment, Tier};
//! use chrono::NaiveDate;
//!
//! let seg = |l: &str, b, e| Segment::new(l, b, e).unwrap();
//! let doc = Document::new("session.eaf", vec![
//!     Tier::new("A", vec![seg("x", 0, 10), seg("y", 20, 30)]),
//!     Tier::new("B", vec![seg("x", 0, 10), seg("x", 20, 30)]),
//! ]);
//! let policy = SelectionPolicy::new().with_tier_pair("A", "B");
//! let outcome = Engine::new(policy).run(Some(&doc), &MemoryStore::new()).unwrap();
//!
//! let created = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
//! let text = report::render_report(&outcome, &created).unwrap();
//! assert!(text.starts_with("Output created: 01/02/24 03:04:05\n\n"));
//! ```

mod format;
mod multi;
mod pairwise;

use chrono::NaiveDateTime;
use std::io::Write;

use crate::engine::{AgreementResults, ComputeOutcome};
use crate::error::Result;

/// Render the plain text report.
///
/// Fails when the outcome holds no observed value at all.
pub fn render_report(outcome: &ComputeOutcome, created: &NaiveDateTime) -> Result<String> {
    match &outcome.results {
        AgreementResults::Pairwise(p) => pairwise::render(outcome, p, created),
        AgreementResults::Groups(g) => multi::render(outcome, g, created),
    }
}

/// Write the plain text report.
pub fn write_report<W: Write>(writer: &mut W, outcome: &ComputeOutcome, created: &NaiveDateTime) -> Result<()> {
    let text = render_report(outcome, created)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render the outcome as pretty-printed JSON.
pub fn render_json(outcome: &ComputeOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}
