//! The agreement computation as one long-running task.
//!
//! Phases and their share of the progress range:
//!
//! | phase | progress |
//! |-------|----------|
//! | building combinations | 0 to 30 |
//! | matching and tabulating, per combination | 30 to 80 |
//! | aggregation | 80 to 100 |
//!
//! Combinations are independent; with the `parallel` feature they are
//! computed on the rayon pool. Results keep combination order either way and
//! merging happens afterwards on one thread. Cancellation is polled before
//! each combination; finished work is kept and the outcome is marked partial.

use serde::Serialize;

use accord_core::{Combination, Document, MultiRaterCombination, PairwiseCombination};

use crate::aggregate::{AggregatedResults, ResultAggregator};
use crate::analysis::{GroupAnalysis, PairwiseAnalysis};
use crate::builder::{CombinationBuilder, BUILD_PROGRESS_END};
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::policy::{SelectionPolicy, SourceScope};
use crate::progress::{CancellationToken, NoProgress, Progress, ProgressSink, ProgressSpan};
use crate::store::DocumentStore;

const MATCH_PROGRESS_END: u8 = 80;

/// Pairwise results: per combination and merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseResults {
    /// One entry per computed combination, in combination order.
    pub combinations: Vec<PairwiseAnalysis>,
    /// Global and per tier pair totals.
    pub aggregate: AggregatedResults,
}

/// Group results, one per group in combination order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResults {
    /// Per group.
    pub groups: Vec<GroupAnalysis>,
}

/// Results of either kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgreementResults {
    /// Modified Cohen's kappa per pair and merged.
    Pairwise(PairwiseResults),
    /// Modified Fleiss' kappa per group.
    Groups(GroupResults),
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputeOutcome {
    /// The settings of the run.
    pub policy: SelectionPolicy,
    /// Statistics.
    pub results: AgreementResults,
    /// Skips and warnings, in the order raised.
    pub diagnostics: Vec<Diagnostic>,
    /// Documents involved.
    pub file_count: usize,
    /// Tier names selected.
    pub selected_tier_count: usize,
    /// Combinations requested by the builder.
    pub requested: usize,
    /// Whether cancellation cut the run short.
    pub partial: bool,
}

impl ComputeOutcome {
    /// Whether the single current document was the source.
    #[must_use]
    pub fn is_current_document(&self) -> bool {
        self.policy.scope == SourceScope::CurrentDocument
    }

    /// Diagnostic messages, in order.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    /// Number of computed combinations.
    #[must_use]
    pub fn completed(&self) -> usize {
        match &self.results {
            AgreementResults::Pairwise(p) => p.combinations.len(),
            AgreementResults::Groups(g) => g.groups.len(),
        }
    }
}

/// Runs a policy against documents.
#[derive(Debug, Clone)]
pub struct Engine {
    policy: SelectionPolicy,
}

impl Engine {
    /// Create an engine for a policy.
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// The policy.
    #[must_use]
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Run without progress reporting or cancellation.
    pub fn run(&self, current: Option<&Document>, store: &dyn DocumentStore) -> Result<ComputeOutcome> {
        self.compute(current, store, &NoProgress, &CancellationToken::new())
    }

    /// Build combinations, match, tabulate and aggregate.
    ///
    /// Fails on configuration errors, and with [`Error::NothingToCompare`]
    /// when no combination survives validation.
    pub fn compute(
        &self,
        current: Option<&Document>,
        store: &dyn DocumentStore,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ComputeOutcome> {
        let progress = Progress::new(sink);
        let built = CombinationBuilder::new(&self.policy, store).build(current, &progress, cancel)?;
        let mut diagnostics = built.diagnostics;
        let requested = built.combinations.len();

        if requested == 0 && !built.cancelled {
            log::warn!("There are no segments for the agreement calculation, process stopped.");
            return Err(Error::NothingToCompare(diagnostics));
        }

        let mut pairs = Vec::new();
        let mut groups = Vec::new();
        for c in built.combinations {
            match c {
                Combination::Pairwise(p) => pairs.push(p),
                Combination::MultiRater(m) => groups.push(m),
            }
        }

        progress.report(BUILD_PROGRESS_END, Some("Building agreement tables..."));
        let span = progress.span(BUILD_PROGRESS_END, MATCH_PROGRESS_END, requested);
        let results = if self.policy.group_wise {
            let threshold = self.policy.average_overlap;
            let computed = map_ordered(groups, cancel, &span, |g: MultiRaterCombination| {
                GroupAnalysis::compute(g, threshold)
            });
            for g in &computed {
                diagnostics.extend(g.diagnostics.iter().cloned());
            }
            AgreementResults::Groups(GroupResults { groups: computed })
        } else {
            let threshold = self.policy.overlap;
            let computed = map_ordered(pairs, cancel, &span, |p: PairwiseCombination| {
                PairwiseAnalysis::compute(p, threshold)
            });
            progress.report(MATCH_PROGRESS_END, Some("Starting global agreement calculations..."));
            let mut aggregator = ResultAggregator::new(self.policy.per_tier_pair);
            for analysis in &computed {
                aggregator.add_analysis(analysis)?;
            }
            AgreementResults::Pairwise(PairwiseResults {
                combinations: computed,
                aggregate: aggregator.finish(),
            })
        };

        let mut outcome = ComputeOutcome {
            policy: self.policy.clone(),
            results,
            diagnostics,
            file_count: built.file_count,
            selected_tier_count: built.selected_tier_count,
            requested,
            partial: built.cancelled,
        };
        if built.cancelled || outcome.completed() < requested {
            outcome.partial = true;
            outcome.diagnostics.push(
                Diagnostic::Cancelled {
                    completed: outcome.completed(),
                    total: requested,
                }
                .logged(),
            );
        }

        let noun = if self.policy.group_wise { "groups" } else { "pairs" };
        let message = format!("Completed calculations of {} {} of tiers.", outcome.completed(), noun);
        log::info!("{message}");
        progress.report(100, Some(&message));
        Ok(outcome)
    }
}

/// Convenience wrapper around [`Engine::compute`].
pub fn compute(
    policy: &SelectionPolicy,
    current: Option<&Document>,
    store: &dyn DocumentStore,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<ComputeOutcome> {
    Engine::new(policy.clone()).compute(current, store, sink, cancel)
}

/// Apply `f` to each item unless cancelled, keeping input order.
#[cfg(not(feature = "parallel"))]
fn map_ordered<T, R, F>(items: Vec<T>, cancel: &CancellationToken, span: &ProgressSpan<'_, '_>, f: F) -> Vec<R>
where
    F: Fn(T) -> R,
{
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if cancel.is_cancelled() {
            break;
        }
        out.push(f(item));
        span.step();
    }
    out
}

/// Apply `f` to each item unless cancelled, keeping input order.
#[cfg(feature = "parallel")]
fn map_ordered<T, R, F>(items: Vec<T>, cancel: &CancellationToken, span: &ProgressSpan<'_, '_>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    use rayon::prelude::*;

    let results: Vec<Option<R>> = items
        .into_par_iter()
        .map(|item| {
            if cancel.is_cancelled() {
                return None;
            }
            let r = f(item);
            span.step();
            Some(r)
        })
        .collect();
    results.into_iter().flatten().collect()
}
