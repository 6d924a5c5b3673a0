//! Labeled confusion matrix between two raters.

use serde::Serialize;

use accord_core::{Label, Segment};

use crate::error::{Error, Result};
use crate::matching::PairwiseMatches;

/// Square count matrix over sorted labels; `Unmatched` is always the last label.
///
/// Rows are the first rater, columns the second. Counts only grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementTable {
    labels: Vec<Label>,
    counts: Vec<Vec<u64>>,
    doubled: bool,
}

impl Default for AgreementTable {
    fn default() -> Self {
        Self {
            labels: vec![Label::Unmatched],
            counts: vec![vec![0]],
            doubled: false,
        }
    }
}

impl AgreementTable {
    /// An empty table over `labels` (sorted, de-duplicated, `Unmatched` appended).
    #[must_use]
    pub fn new(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut labels: Vec<Label> = labels.into_iter().collect();
        labels.push(Label::Unmatched);
        labels.sort();
        labels.dedup();
        let n = labels.len();
        Self {
            labels,
            counts: vec![vec![0; n]; n],
            doubled: false,
        }
    }

    /// Tabulate a pairwise matching.
    ///
    /// Equal labels land on the diagonal, differing labels off it; segments
    /// without a counterpart are counted against `Unmatched`. Matched cells are
    /// not doubled yet, see [`double_matched`](Self::double_matched).
    #[must_use]
    pub fn from_matches(first: &[Segment], second: &[Segment], matches: &PairwiseMatches) -> Self {
        let labels = first
            .iter()
            .chain(second)
            .map(|s| Label::observed(s.label()));
        let mut table = Self::new(labels);
        for &(i, j) in &matches.pairs {
            table.add_count(&Label::observed(first[i].label()), &Label::observed(second[j].label()), 1);
        }
        for &i in &matches.unmatched_first {
            table.add_count(&Label::observed(first[i].label()), &Label::Unmatched, 1);
        }
        for &j in &matches.unmatched_second {
            table.add_count(&Label::Unmatched, &Label::observed(second[j].label()), 1);
        }
        table
    }

    /// Labels in row/column order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Rows of counts.
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Position of `label`.
    #[must_use]
    pub fn index_of(&self, label: &Label) -> Option<usize> {
        self.labels.binary_search(label).ok()
    }

    /// Count at `(row, column)`; zero for unknown labels.
    #[must_use]
    pub fn get(&self, row: &Label, column: &Label) -> u64 {
        match (self.index_of(row), self.index_of(column)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0,
        }
    }

    /// Add `n` to a cell, extending the vocabulary with unknown labels.
    pub fn add_count(&mut self, row: &Label, column: &Label, n: u64) {
        let i = self.ensure_label(row);
        let j = self.ensure_label(column);
        self.counts[i][j] += n;
    }

    /// Add one co-occurrence.
    pub fn increment(&mut self, row: &Label, column: &Label) {
        self.add_count(row, column, 1);
    }

    fn ensure_label(&mut self, label: &Label) -> usize {
        match self.labels.binary_search(label) {
            Ok(i) => i,
            Err(i) => {
                self.labels.insert(i, label.clone());
                for row in &mut self.counts {
                    row.insert(i, 0);
                }
                self.counts.insert(i, vec![0; self.labels.len()]);
                i
            }
        }
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Sum of row `i`.
    #[must_use]
    pub fn row_total(&self, i: usize) -> u64 {
        self.counts[i].iter().sum()
    }

    /// Sum of column `j`.
    #[must_use]
    pub fn column_total(&self, j: usize) -> u64 {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Whether matched cells have been doubled.
    #[must_use]
    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    /// Whether every cell is zero and no label besides `Unmatched` is known.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.labels.len() == 1 && self.total() == 0
    }

    /// Count every matched pair twice, once per rater, so that matched and
    /// unmatched segments weigh the same. Cells in the `Unmatched` row or
    /// column are left alone. Applies once; later calls return `false`.
    pub fn double_matched(&mut self) -> bool {
        if self.doubled {
            return false;
        }
        let last = self.labels.len() - 1;
        for row in self.counts.iter_mut().take(last) {
            for cell in row.iter_mut().take(last) {
                *cell *= 2;
            }
        }
        self.doubled = true;
        true
    }

    /// Add `other` cell by cell, aligning labels by name.
    ///
    /// Both tables must agree on doubling; a blank table takes over the other's state.
    pub fn merge(&mut self, other: &AgreementTable) -> Result<()> {
        if self.is_blank() {
            self.doubled = other.doubled;
        } else if !other.is_blank() && self.doubled != other.doubled {
            return Err(Error::invalid_input(
                "cannot merge agreement tables with and without doubled matches",
            ));
        }
        for (i, row_label) in other.labels.iter().enumerate() {
            for (j, column_label) in other.labels.iter().enumerate() {
                let n = other.counts[i][j];
                if n > 0 {
                    self.add_count(row_label, column_label, n);
                } else {
                    self.ensure_label(row_label);
                    self.ensure_label(column_label);
                }
            }
        }
        Ok(())
    }

    /// Observed labels and the matrix without the `Unmatched` row and column.
    #[must_use]
    pub fn without_unmatched(&self) -> (Vec<Label>, Vec<Vec<u64>>) {
        let last = self.labels.len() - 1;
        let labels = self.labels[..last].to_vec();
        let counts = self.counts[..last]
            .iter()
            .map(|row| row[..last].to_vec())
            .collect();
        (labels, counts)
    }

    /// One-vs-rest view for `label`; `None` for `Unmatched` or unknown labels.
    #[must_use]
    pub fn two_square(&self, label: &Label) -> Option<TwoSquareTable> {
        if label.is_unmatched() {
            return None;
        }
        let c = self.index_of(label)?;
        let agree = self.counts[c][c];
        let only_first = self.row_total(c) - agree;
        let only_second = self.column_total(c) - agree;
        let neither = self.total() - agree - only_first - only_second;
        Some(TwoSquareTable {
            cells: [[agree, only_second], [only_first, neither]],
        })
    }
}

/// 2×2 table for one category `c`.
///
/// Layout `[[agree, only second], [only first, neither]]`: the first rater
/// says "not c" in the second row, the second rater in the second column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TwoSquareTable {
    cells: [[u64; 2]; 2],
}

impl TwoSquareTable {
    /// Build from cell counts.
    #[must_use]
    pub fn new(agree: u64, only_first: u64, only_second: u64, neither: u64) -> Self {
        Self {
            cells: [[agree, only_second], [only_first, neither]],
        }
    }

    /// Both raters chose `c`.
    #[must_use]
    pub fn agree(&self) -> u64 {
        self.cells[0][0]
    }

    /// Only the first rater chose `c`.
    #[must_use]
    pub fn only_first(&self) -> u64 {
        self.cells[1][0]
    }

    /// Only the second rater chose `c`.
    #[must_use]
    pub fn only_second(&self) -> u64 {
        self.cells[0][1]
    }

    /// Neither rater chose `c`.
    #[must_use]
    pub fn neither(&self) -> u64 {
        self.cells[1][1]
    }

    /// The cells, row major.
    #[must_use]
    pub fn cells(&self) -> &[[u64; 2]; 2] {
        &self.cells
    }
}
