//! Plain text report for group-wise (modified Fleiss' kappa) results.

use chrono::NaiveDateTime;

use crate::agreement::{FleissMatrix, FleissStatistics};
use crate::analysis::GroupAnalysis;
use crate::engine::{ComputeOutcome, GroupResults};
use crate::error::{Error, Result};

use super::format::{files_line, header, label, signed};

pub(crate) fn render(outcome: &ComputeOutcome, results: &GroupResults, created: &NaiveDateTime) -> Result<String> {
    if results.groups.is_empty() {
        return Err(Error::data_absent("There are no results to save."));
    }

    let mut out = header(created);
    out.push_str("Calculating Fleiss' kappa per group of matching tiers.\n");
    out.push_str("k = (P - Pe) / (1 - Pe), see https://en.wikipedia.org/wiki/Fleiss'_kappa\n");
    out.push_str(&files_line(outcome.is_current_document(), outcome.file_count));
    out.push_str(&format!("Number of selected tiers: {}\n", outcome.selected_tier_count));
    out.push_str(&format!(
        "Preferred average overlap percentage: {}%\n\n",
        outcome.policy.average_overlap.percent()
    ));

    for (i, group) in results.groups.iter().enumerate() {
        out.push_str(&group_block(i, group, outcome.policy.include_tables));
    }
    Ok(out)
}

fn group_block(index: usize, group: &GroupAnalysis, tables: bool) -> String {
    let units = &group.combination.units;
    let empty = units.iter().filter(|u| u.is_empty()).count();
    let mut out = format!("Comparison cluster: {index}\n");
    out.push_str(&format!(
        "Number of tiers in this cluster: {} ({} without annotations)\n",
        units.len(),
        empty
    ));
    for (j, unit) in units.iter().enumerate() {
        out.push_str(&format!(
            "File: {}, Tier {}: {}, #Annotations: {}\n",
            unit.source,
            j,
            unit.tier,
            unit.segments.len()
        ));
    }

    if group.clusters.is_empty() {
        out.push_str("There are no clusters of matching annotations for this combination.\n\n");
        return out;
    }

    out.push_str(&equation("Kappa including \"Unmatched\" value: ", &group.including));
    out.push_str(&equation("Kappa excluding \"Unmatched\" value:  ", &group.excluding));
    if tables {
        out.push_str(&matrix(&group.including_matrix, &group.including));
        out.push('\n');
        out.push_str(&matrix(&group.excluding_matrix, &group.excluding));
        out.push('\n');
    }
    out
}

fn equation(prefix: &str, stats: &FleissStatistics) -> String {
    let p = signed(stats.mean_agreement);
    let pe = signed(stats.expected_agreement);
    let mut line = format!(
        "{prefix}k = ({p} - {pe}) / (1.0 - {pe}) = {}",
        signed(stats.result.kappa)
    );
    if stats.expected_is_one {
        line.push_str(" (k = 1.0)");
    }
    line.push('\n');
    line
}

fn matrix(m: &FleissMatrix, stats: &FleissStatistics) -> String {
    let mut out = String::from("\t");
    for c in m.categories() {
        out.push_str(&label(c));
        out.push('\t');
    }
    out.push_str("Pi\n");
    for (i, (row, pi)) in m.rows().iter().zip(&stats.subject_agreement).enumerate() {
        out.push_str(&format!("{}\t", i + 1));
        for n in row {
            out.push_str(&format!("{n}\t"));
        }
        out.push_str(&signed(*pi));
        out.push('\n');
    }
    out.push_str("Total\t");
    for t in &stats.column_totals {
        out.push_str(&format!("{t}\t"));
    }
    out.push_str("\t\n");
    out.push_str("pj\t");
    for p in &stats.column_proportions {
        out.push_str(&signed(*p));
        out.push('\t');
    }
    out.push_str("\t\n");
    out
}
