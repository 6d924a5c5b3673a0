//! Utility functions for CLI commands

use chrono::NaiveDateTime;

use crate::policy::{AverageThreshold, OverlapThreshold};
use crate::store::{DocumentStore, JsonStore};
use accord_core::Document;

/// Parse `--overlap`: an integer percentage (51-100) or a fraction in (0.5, 1.0].
/// `1` is the fraction, i.e. full overlap.
pub fn parse_overlap(s: &str) -> Result<OverlapThreshold, String> {
    let parsed = match s.trim().parse::<u32>() {
        Ok(percent) if percent > 1 => OverlapThreshold::from_percent(percent),
        _ => {
            let value: f64 = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
            OverlapThreshold::new(value)
        }
    };
    parsed.map_err(|e| e.to_string())
}

/// Parse `--average-overlap`: an integer percentage or a fraction in [0, 1].
pub fn parse_average_overlap(s: &str) -> Result<AverageThreshold, String> {
    let parsed = match s.trim().parse::<u32>() {
        Ok(percent) if percent > 1 => AverageThreshold::from_percent(percent),
        _ => {
            let value: f64 = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
            AverageThreshold::new(value)
        }
    };
    parsed.map_err(|e| e.to_string())
}

/// Read a JSON document from disk.
pub fn read_document(path: &str) -> Result<Document, String> {
    JsonStore
        .open(path)
        .map_err(|e| format!("Failed to read document {}: {}", path, e))
}

/// Local time for the report header.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
