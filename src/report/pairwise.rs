//! Plain text report for pairwise (modified Cohen's kappa) results.

use chrono::NaiveDateTime;

use crate::agreement::{AgreementTable, CategoryAgreement, OverallAgreement};
use crate::aggregate::AggregateAnalysis;
use crate::analysis::PairwiseAnalysis;
use crate::engine::{ComputeOutcome, PairwiseResults};
use crate::error::{Error, Result};

use super::format::{clamped, files_line, header, label};

const LEGEND: &str = "NaN\t: a kappa value of \"NaN\" usually indicates a division by zero\n\
0\t: a kappa value of \"0\" replaces a value < 0 (negative kappa), as opposed to the value \"0.000\"\n\n";

pub(crate) fn render(outcome: &ComputeOutcome, results: &PairwiseResults, created: &NaiveDateTime) -> Result<String> {
    let global = &results.aggregate.global;
    if global.table.labels().iter().all(|l| l.is_unmatched()) {
        return Err(Error::data_absent("There are no results to save."));
    }
    let policy = &outcome.policy;

    let mut out = header(created);
    out.push_str(LEGEND);
    out.push_str(&files_line(outcome.is_current_document(), outcome.file_count));
    out.push_str(&format!("Number of selected tiers: {}\n", outcome.selected_tier_count));
    out.push_str(&format!(
        "Number of pairs of tiers in the comparison: {}\n",
        results.combinations.len()
    ));
    out.push_str(&format!(
        "Required minimal overlap percentage: {}%\n\n",
        policy.overlap.percent()
    ));

    out.push_str("Global results of all files and all tiers:\n");
    out.push_str(&values_table(&global.categories));
    out.push('\n');
    out.push_str("Global kappa values and agreement matrix:\n");
    out.push_str(&agreement_matrix(&global.table, &global.overall));
    out.push_str("\n\n");

    out.push_str("Global per value agreement table:\n");
    for l in global.table.labels().iter().filter(|l| !l.is_unmatched()) {
        out.push_str(&label(l));
        out.push('\n');
        match global.table.two_square(l) {
            Some(tst) => {
                let [[a, b], [c, d]] = *tst.cells();
                out.push_str(&format!("{a}\t{b}\n{c}\t{d}\n"));
            }
            None => out.push('-'),
        }
        out.push('\n');
    }

    if policy.per_tier_pair {
        out.push_str(&per_tier_pair(results));
    }

    out.push_str("End of global results.\n");
    out.push_str("################################################");

    if policy.per_tier_pair {
        out.push_str("\n\n");
        out.push_str("Results per individual tier combination: kappa,\tkappa_max,\traw agreement\n");
        for analysis in &results.combinations {
            out.push_str(&combination_block(analysis));
        }
    }
    Ok(out)
}

fn per_tier_pair(results: &PairwiseResults) -> String {
    let mut out = String::from("======================================================\n");
    out.push_str("Overall results per tier combination\n\n");
    for (key, AggregateAnalysis { table, overall, categories }) in &results.aggregate.per_tier_pair {
        out.push_str(&format!("Tier combination: {key}\n"));
        out.push_str("Per value:\n");
        out.push_str(&values_table(categories));
        out.push('\n');
        out.push_str("Overall kappa values and agreement matrix:\n");
        out.push_str(&agreement_matrix(table, overall));
        out.push_str("------------------------------------------------------\n\n");
    }
    out
}

fn combination_block(analysis: &PairwiseAnalysis) -> String {
    let (first, second) = (&analysis.combination.first, &analysis.combination.second);
    let mut out = format!(
        "File 1: {} Tier 1: {}\nFile 2: {} Tier 2: {}\n",
        first.source,
        first.tier,
        second.source,
        second.tier
    );
    for c in &analysis.categories {
        out.push_str(&value_row(c));
    }
    out.push('\n');
    out
}

fn values_table(categories: &[CategoryAgreement]) -> String {
    let mut out = String::from("value\tkappa\tkappa_max\traw agreement\n");
    for c in categories {
        out.push_str(&value_row(c));
    }
    out
}

fn value_row(c: &CategoryAgreement) -> String {
    format!(
        "{}\t{}\t{}\t{}\n",
        label(&c.label),
        clamped(c.result.kappa),
        clamped(c.result.kappa_max),
        clamped(c.result.raw_agreement)
    )
}

fn agreement_matrix(table: &AgreementTable, overall: &OverallAgreement) -> String {
    let mut out = String::from("Overall results (incl. unlinked/unmatched annotations):\n");
    out.push_str("kappa\tkappa_max\traw agreement\n");
    let inc = &overall.including;
    out.push_str(&format!(
        "{}\t{}\t{}",
        clamped(inc.kappa),
        clamped(inc.kappa_max),
        clamped(inc.raw_agreement)
    ));
    out.push_str("\n\n");

    out.push_str("Overall results (excl. unlinked/unmatched annotations):\n");
    if table.labels().len() > 2 {
        let exc = &overall.excluding;
        out.push_str("kappa (excl.)\tkappa_max (excl.)\traw agreement (excl.)\n");
        out.push_str(&format!(
            "{}\t{}\t{}",
            clamped(exc.kappa),
            clamped(exc.kappa_max),
            clamped(exc.raw_agreement)
        ));
    } else {
        out.push_str("\tNot available because there is only one value in the matrix apart from the Unmatched category");
    }

    out.push_str("\n\n");
    out.push_str("Overall Agreement Matrix:\n");
    out.push_str("First annotator in the rows, second annotator in the columns\n\n");
    out.push('\t');
    for l in table.labels() {
        out.push_str(&label(l));
        out.push('\t');
    }
    out.push('\n');
    for (l, row) in table.labels().iter().zip(table.counts()) {
        out.push_str(&label(l));
        out.push('\t');
        for n in row {
            out.push_str(&format!("{n}\t"));
        }
        out.push('\n');
    }
    out
}
