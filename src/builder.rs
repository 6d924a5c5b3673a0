//! Translating a [`SelectionPolicy`] into combinations of tiers to compare.
//!
//! The builder only gathers data. It resolves tier and file names, loads
//! documents, and validates what it finds, so that matchers never receive a
//! degenerate combination. Fatal policy problems are returned as
//! [`ConfigError`]s; missing or empty data becomes a [`Diagnostic`] and the
//! affected combination is skipped.
//!
//! | scope | tier matching | pairwise | group-wise |
//! |-------|---------------|----------|------------|
//! | current document / same file | manual | first and second tier | selected tiers |
//! | current document / same file | prefix, suffix | all pairs per stem | one group per stem |
//! | across files | manual | both directions per file pair | best-effort assignment |
//! | across files | prefix, suffix | both directions per name pair | best-effort per stem |
//! | across files | same name | per file pair and name | one group per name |

use std::collections::BTreeSet;

use accord_core::{Combination, CompareUnit, Document, MultiRaterCombination, PairwiseCombination, Tier};

use crate::diagnostic::Diagnostic;
use crate::error::{ConfigError, Result};
use crate::naming::MatchingMode;
use crate::policy::{SelectionPolicy, SourceScope};
use crate::progress::{CancellationToken, Progress};
use crate::store::DocumentStore;

/// Percentage at which the building phase ends.
pub(crate) const BUILD_PROGRESS_END: u8 = 30;

/// Result of the building phase.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Combinations in creation order.
    pub combinations: Vec<Combination>,
    /// Skips and warnings, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
    /// Documents involved.
    pub file_count: usize,
    /// Tier names selected by the policy.
    pub selected_tier_count: usize,
    /// Whether building stopped early because of cancellation.
    pub cancelled: bool,
}

/// Builds combinations from a policy, a document store, and an optional current document.
pub struct CombinationBuilder<'a> {
    policy: &'a SelectionPolicy,
    store: &'a dyn DocumentStore,
}

impl<'a> CombinationBuilder<'a> {
    /// Create a builder.
    pub fn new(policy: &'a SelectionPolicy, store: &'a dyn DocumentStore) -> Self {
        Self { policy, store }
    }

    /// Check the policy for contradictions before any data is touched.
    pub fn validate(&self, current: Option<&Document>) -> std::result::Result<(), ConfigError> {
        let p = self.policy;
        match p.scope {
            SourceScope::CurrentDocument => {
                if current.is_none() {
                    return Err(ConfigError::NoCurrentDocument);
                }
                if p.tier_matching == MatchingMode::SameName {
                    return Err(ConfigError::SameNameWithinDocument);
                }
            }
            SourceScope::SameFile => {
                if p.files.is_empty() {
                    return Err(ConfigError::NoFilesSelected);
                }
                if p.tier_matching == MatchingMode::SameName {
                    return Err(ConfigError::SameNameInSameFile);
                }
            }
            SourceScope::AcrossFiles => {
                if p.files.is_empty() {
                    return Err(ConfigError::NoFilesSelected);
                }
                if p.files.len() < 2 {
                    return Err(ConfigError::TooFewFiles(p.files.len()));
                }
                if p.file_matching.is_none() {
                    return Err(ConfigError::MissingFileMatching);
                }
            }
        }

        match (p.tier_matching, p.group_wise) {
            (MatchingMode::Manual, false) => {
                let first = p.first_tier.as_deref().filter(|s| !s.is_empty());
                let second = p.second_tier.as_deref().filter(|s| !s.is_empty());
                let first = first.ok_or(ConfigError::MissingFirstTier)?;
                let second = second.ok_or(ConfigError::MissingSecondTier)?;
                if first == second {
                    return Err(ConfigError::IdenticalTiers(first.to_string()));
                }
            }
            (MatchingMode::Manual, true) => {
                if p.selected_tiers.is_empty() {
                    return Err(ConfigError::NoTiersSelected);
                }
                if p.selected_tiers.len() < 2 && p.scope != SourceScope::AcrossFiles {
                    return Err(ConfigError::TooFewGroupTiers(p.selected_tiers.len()));
                }
            }
            _ => {
                if p.selected_tiers.is_empty() {
                    return Err(ConfigError::NoTiersSelected);
                }
            }
        }
        Ok(())
    }

    /// Build all combinations. Cancellation is checked once per document or file group.
    pub fn build(
        &self,
        current: Option<&Document>,
        progress: &Progress<'_>,
        cancel: &CancellationToken,
    ) -> Result<BuildOutcome> {
        self.validate(current)?;
        let p = self.policy;
        log::info!(
            "Building combinations: scope {:?}, tier matching {}, group-wise {}",
            p.scope,
            p.tier_matching,
            p.group_wise
        );
        progress.report(1, Some("Extracting tiers and annotations..."));

        let mut out = Collector::default();
        let selected_tier_count = if p.tier_matching == MatchingMode::Manual && !p.group_wise {
            2
        } else {
            p.selected_tiers.len()
        };

        let (file_count, cancelled) = match (p.scope, current) {
            (SourceScope::CurrentDocument, Some(doc)) => {
                let cancelled = self.within_documents(&[doc], &mut out, progress, cancel);
                (1, cancelled)
            }
            (SourceScope::CurrentDocument, None) => return Err(ConfigError::NoCurrentDocument.into()),
            (SourceScope::SameFile, _) => {
                let docs = self.load(&p.files, &mut out);
                let refs: Vec<&Document> = docs.iter().collect();
                let cancelled = self.within_documents(&refs, &mut out, progress, cancel);
                (docs.len(), cancelled)
            }
            (SourceScope::AcrossFiles, _) => {
                let docs = self.load(&p.files, &mut out);
                let cancelled = self.across_files(&docs, &mut out, progress, cancel);
                (docs.len(), cancelled)
            }
        };

        progress.report(BUILD_PROGRESS_END, None);
        log::info!(
            "Built {} combinations from {} files ({} diagnostics)",
            out.combinations.len(),
            file_count,
            out.diagnostics.len()
        );
        Ok(BuildOutcome {
            combinations: out.combinations,
            diagnostics: out.diagnostics,
            file_count,
            selected_tier_count,
            cancelled,
        })
    }

    fn load(&self, paths: &[String], out: &mut Collector) -> Vec<Document> {
        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match self.store.open(path) {
                Ok(doc) => docs.push(doc),
                Err(e) => out.warn(Diagnostic::UnreadableDocument {
                    path: path.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        docs
    }

    // =========================================================================
    // Tiers within one document
    // =========================================================================

    fn within_documents(
        &self,
        docs: &[&Document],
        out: &mut Collector,
        progress: &Progress<'_>,
        cancel: &CancellationToken,
    ) -> bool {
        let span = progress.span(1, BUILD_PROGRESS_END, docs.len());
        for doc in docs {
            if cancel.is_cancelled() {
                return true;
            }
            self.within_document(doc, out);
            span.step();
        }
        false
    }

    fn within_document(&self, doc: &Document, out: &mut Collector) {
        let p = self.policy;
        match (p.tier_matching, p.group_wise) {
            (MatchingMode::Manual, false) => {
                let (Some(first), Some(second)) = (&p.first_tier, &p.second_tier) else {
                    return;
                };
                let a = doc.tier(first);
                let b = doc.tier(second);
                match (a, b) {
                    (Some(a), Some(b)) => out.pair(&doc.path, a, &doc.path, b),
                    _ => {
                        for (name, tier) in [(first, a), (second, b)] {
                            if tier.is_none() {
                                out.warn(Diagnostic::MissingTier {
                                    tier: name.clone(),
                                    source: doc.path.clone(),
                                });
                            }
                        }
                    }
                }
            }
            (MatchingMode::Manual, true) => {
                let members = lookup_all(doc, &p.selected_tiers, out);
                out.group(members);
            }
            (MatchingMode::Prefix | MatchingMode::Suffix, group_wise) => {
                let groups = p.tier_matcher().group(&doc.tier_names(), &p.selected_tiers);
                for names in groups {
                    let members = lookup_all(doc, &names, out);
                    if group_wise {
                        out.group(members);
                    } else {
                        for i in 0..members.len() {
                            for j in i + 1..members.len() {
                                out.pair(members[i].0, members[i].1, members[j].0, members[j].1);
                            }
                        }
                    }
                }
            }
            // Rejected by validate().
            (MatchingMode::SameName, _) => {}
        }
    }

    // =========================================================================
    // Tiers across matched files
    // =========================================================================

    fn across_files(
        &self,
        docs: &[Document],
        out: &mut Collector,
        progress: &Progress<'_>,
        cancel: &CancellationToken,
    ) -> bool {
        let p = self.policy;
        let Some(matcher) = p.file_matcher() else {
            return false;
        };
        let paths: Vec<String> = docs.iter().map(|d| d.path.clone()).collect();
        let groups: Vec<Vec<&Document>> = matcher
            .group_files(&paths)
            .into_iter()
            .map(|group| {
                group
                    .iter()
                    .filter_map(|path| docs.iter().find(|d| &d.path == path))
                    .collect()
            })
            .collect();

        if groups.iter().all(|g| g.len() < 2) {
            out.warn(Diagnostic::NoMatchingFiles);
            return false;
        }

        let span = progress.span(1, BUILD_PROGRESS_END, groups.len());
        for group in &groups {
            if cancel.is_cancelled() {
                return true;
            }
            if group.len() < 2 {
                for doc in group {
                    out.warn(Diagnostic::UnpairedFile {
                        path: doc.path.clone(),
                    });
                }
            } else {
                self.across_group(group, out);
            }
            span.step();
        }
        false
    }

    fn across_group(&self, docs: &[&Document], out: &mut Collector) {
        let p = self.policy;
        match (p.tier_matching, p.group_wise) {
            (MatchingMode::Manual, false) => {
                let (Some(first), Some(second)) = (&p.first_tier, &p.second_tier) else {
                    return;
                };
                for_each_file_pair(docs, |a, b| cross_pair(a, b, first, second, true, out));
            }
            (MatchingMode::Manual, true) => {
                best_effort(docs, &p.selected_tiers, out);
            }
            (MatchingMode::Prefix | MatchingMode::Suffix, group_wise) => {
                let mut available: Vec<String> = Vec::new();
                for doc in docs {
                    for name in doc.tier_names() {
                        if !available.contains(&name) {
                            available.push(name);
                        }
                    }
                }
                let tier_groups = p.tier_matcher().group(&available, &p.selected_tiers);
                if group_wise {
                    for names in &tier_groups {
                        best_effort(docs, names, out);
                    }
                } else {
                    for_each_file_pair(docs, |a, b| {
                        for names in &tier_groups {
                            for i in 0..names.len() {
                                for j in i + 1..names.len() {
                                    cross_pair(a, b, &names[i], &names[j], false, out);
                                }
                            }
                        }
                    });
                }
            }
            (MatchingMode::SameName, false) => {
                for_each_file_pair(docs, |a, b| {
                    for name in &p.selected_tiers {
                        match (a.tier(name), b.tier(name)) {
                            (Some(ta), Some(tb)) => out.pair(&a.path, ta, &b.path, tb),
                            (ta, tb) => {
                                for (doc, tier) in [(a, ta), (b, tb)] {
                                    if tier.is_none() {
                                        out.warn(Diagnostic::MissingTier {
                                            tier: name.clone(),
                                            source: doc.path.clone(),
                                        });
                                    }
                                }
                            }
                        }
                    }
                });
            }
            (MatchingMode::SameName, true) => {
                for name in &p.selected_tiers {
                    let mut members = Vec::new();
                    for doc in docs {
                        match doc.tier(name) {
                            Some(tier) => members.push((doc.path.as_str(), tier)),
                            None => out.warn(Diagnostic::MissingTier {
                                tier: name.clone(),
                                source: doc.path.clone(),
                            }),
                        }
                    }
                    out.group(members);
                }
            }
        }
    }
}

fn for_each_file_pair<'d>(docs: &[&'d Document], mut f: impl FnMut(&'d Document, &'d Document)) {
    for i in 0..docs.len() {
        for j in i + 1..docs.len() {
            f(docs[i], docs[j]);
        }
    }
}

/// Pair `x` in `a` with `y` in `b`, and `y` in `a` with `x` in `b`, whichever exist.
/// With `report_missing`, a pair found in neither direction is reported.
fn cross_pair(a: &Document, b: &Document, x: &str, y: &str, report_missing: bool, out: &mut Collector) {
    let mut found = false;
    if let (Some(ta), Some(tb)) = (a.tier(x), b.tier(y)) {
        out.pair(&a.path, ta, &b.path, tb);
        found = true;
    }
    if x != y {
        if let (Some(ta), Some(tb)) = (a.tier(y), b.tier(x)) {
            out.pair(&a.path, ta, &b.path, tb);
            found = true;
        }
    }
    if !found && report_missing {
        for (doc, name) in [(a, x), (b, y)] {
            if doc.tier(name).is_none() {
                out.warn(Diagnostic::MissingTier {
                    tier: name.to_string(),
                    source: doc.path.clone(),
                });
            }
        }
    }
}

/// Assign each tier name to the first unused file containing it.
fn best_effort(docs: &[&Document], names: &[String], out: &mut Collector) {
    let mut used = vec![false; docs.len()];
    let mut members = Vec::new();
    for name in names {
        let slot = docs
            .iter()
            .enumerate()
            .find(|(i, doc)| !used[*i] && doc.tier(name).is_some());
        if let Some((i, doc)) = slot {
            used[i] = true;
            if let Some(tier) = doc.tier(name) {
                members.push((doc.path.as_str(), tier));
            }
        }
    }
    if docs.len() != names.len() || members.len() != names.len() {
        out.warn(Diagnostic::PartialAssignment {
            files: docs.len(),
            tiers: names.len(),
            assigned: members.len(),
        });
    }
    out.group(members);
}

fn lookup_all<'d>(doc: &'d Document, names: &[String], out: &mut Collector) -> Vec<(&'d str, &'d Tier)> {
    let mut members = Vec::new();
    for name in names {
        match doc.tier(name) {
            Some(tier) => members.push((doc.path.as_str(), tier)),
            None => out.warn(Diagnostic::MissingTier {
                tier: name.clone(),
                source: doc.path.clone(),
            }),
        }
    }
    members
}

// =============================================================================
// Collector
// =============================================================================

#[derive(Default)]
struct Collector {
    combinations: Vec<Combination>,
    diagnostics: Vec<Diagnostic>,
}

impl Collector {
    fn warn(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic.logged());
    }

    fn pair(&mut self, source_a: &str, a: &Tier, source_b: &str, b: &Tier) {
        if a.is_empty() && b.is_empty() {
            self.warn(Diagnostic::BothTiersEmpty {
                first: a.name.clone(),
                second: b.name.clone(),
            });
            return;
        }
        log::debug!("Pair {} ({}) <> {} ({})", a.name, source_a, b.name, source_b);
        self.combinations.push(Combination::Pairwise(PairwiseCombination::new(
            CompareUnit::from_tier(source_a, a),
            CompareUnit::from_tier(source_b, b),
        )));
    }

    fn group(&mut self, members: Vec<(&str, &Tier)>) {
        let all_names: Vec<String> = members.iter().map(|(_, t)| t.name.clone()).collect();
        let mut kept = Vec::with_capacity(members.len());
        for (source, tier) in members {
            if tier.is_empty() {
                self.warn(Diagnostic::EmptyTierInGroup {
                    tier: tier.name.clone(),
                    source: source.to_string(),
                });
            } else {
                kept.push((source, tier));
            }
        }
        if kept.len() < 2 {
            self.warn(Diagnostic::TooFewRaters { tiers: all_names });
            return;
        }

        let mut vocabulary_names: Vec<String> = Vec::new();
        let mut values: BTreeSet<String> = BTreeSet::new();
        for (_, tier) in &kept {
            match &tier.vocabulary {
                Some(v) => {
                    if !vocabulary_names.contains(&v.name) {
                        vocabulary_names.push(v.name.clone());
                    }
                    values.extend(v.values.iter().map(|s| s.trim().to_string()));
                }
                None => values.extend(tier.segments.iter().map(|s| s.label().trim().to_string())),
            }
        }
        let vocabulary_name = (!vocabulary_names.is_empty()).then(|| vocabulary_names.join(", "));
        let units = kept
            .iter()
            .map(|(source, tier)| CompareUnit::from_tier(source, tier))
            .collect();
        log::debug!("Group of {} tiers: {}", all_names.len(), all_names.join(", "));
        self.combinations.push(Combination::MultiRater(MultiRaterCombination::new(
            units,
            vocabulary_name,
            values.into_iter().collect(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::store::MemoryStore;
    use accord_core::Segment;

    fn tier(name: &str, n: usize) -> Tier {
        let segments = (0..n)
            .map(|i| Segment::new("x", i as u64 * 100, i as u64 * 100 + 50).unwrap())
            .collect();
        Tier::new(name, segments)
    }

    fn build(policy: &SelectionPolicy, current: Option<&Document>, store: &MemoryStore) -> Result<BuildOutcome> {
        let sink = NoProgress;
        let progress = Progress::new(&sink);
        CombinationBuilder::new(policy, store).build(current, &progress, &CancellationToken::new())
    }

    #[test]
    fn manual_pair_in_current_document() {
        let doc = Document::new("cur", vec![tier("a", 2), tier("b", 1), tier("c", 0)]);
        let policy = SelectionPolicy::new().with_tier_pair("a", "b");
        let out = build(&policy, Some(&doc), &MemoryStore::new()).unwrap();
        assert_eq!(out.combinations.len(), 1);
        assert_eq!(out.file_count, 1);
        assert_eq!(out.selected_tier_count, 2);
    }

    #[test]
    fn identical_manual_tiers_rejected() {
        let doc = Document::new("cur", vec![tier("a", 2)]);
        let policy = SelectionPolicy::new().with_tier_pair("a", "a");
        let err = build(&policy, Some(&doc), &MemoryStore::new()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::IdenticalTiers(_))));
    }

    #[test]
    fn identical_manual_tiers_rejected_across_files() {
        let policy = SelectionPolicy::new()
            .with_scope(SourceScope::AcrossFiles)
            .with_file_matching(crate::policy::FileMatching::Prefix)
            .with_files(["s1_R1.eaf", "s1_R2.eaf"])
            .with_tier_pair("A", "A");
        let err = build(&policy, None, &MemoryStore::new()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::IdenticalTiers(t)) if t == "A"));
    }

    #[test]
    fn missing_second_tier_is_config_error() {
        let doc = Document::new("cur", vec![tier("a", 2)]);
        let mut policy = SelectionPolicy::new();
        policy.first_tier = Some("a".into());
        let err = build(&policy, Some(&doc), &MemoryStore::new()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::MissingSecondTier)));
    }

    #[test]
    fn same_name_rejected_within_document_and_file() {
        let doc = Document::new("cur", vec![tier("a", 1)]);
        let policy = SelectionPolicy::new()
            .with_tier_matching(MatchingMode::SameName)
            .with_selected_tiers(["a"]);
        assert!(matches!(
            build(&policy, Some(&doc), &MemoryStore::new()),
            Err(crate::Error::Config(ConfigError::SameNameWithinDocument))
        ));
        let policy = policy.with_scope(SourceScope::SameFile).with_files(["cur"]);
        assert!(matches!(
            build(&policy, None, &MemoryStore::new()),
            Err(crate::Error::Config(ConfigError::SameNameInSameFile))
        ));
    }

    #[test]
    fn affix_pairs_skip_both_empty() {
        let doc = Document::new(
            "cur",
            vec![tier("A-r1", 0), tier("A-r2", 0), tier("A-r3", 3), tier("B-r1", 1)],
        );
        let policy = SelectionPolicy::new()
            .with_tier_matching(MatchingMode::Prefix)
            .with_tier_separators("-")
            .with_selected_tiers(["A"]);
        let out = build(&policy, Some(&doc), &MemoryStore::new()).unwrap();
        // r1-r2 both empty; r1-r3, r2-r3 kept
        assert_eq!(out.combinations.len(), 2);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::BothTiersEmpty {
                first: "A-r1".into(),
                second: "A-r2".into()
            }]
        );
    }

    #[test]
    fn group_drops_empty_and_needs_two() {
        let doc = Document::new("cur", vec![tier("a", 1), tier("b", 0), tier("c", 2)]);
        let policy = SelectionPolicy::new()
            .with_group_wise(true)
            .with_selected_tiers(["a", "b", "c"]);
        let out = build(&policy, Some(&doc), &MemoryStore::new()).unwrap();
        assert_eq!(out.combinations.len(), 1);
        match &out.combinations[0] {
            Combination::MultiRater(m) => {
                assert_eq!(m.rater_count(), 2);
                assert_eq!(m.values, vec!["x"]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let policy = SelectionPolicy::new()
            .with_group_wise(true)
            .with_selected_tiers(["a", "b"]);
        let out = build(&policy, Some(&doc), &MemoryStore::new()).unwrap();
        assert!(out.combinations.is_empty());
        assert!(matches!(out.diagnostics.last(), Some(Diagnostic::TooFewRaters { .. })));
    }

    #[test]
    fn across_files_requires_file_matching() {
        let policy = SelectionPolicy::new()
            .with_scope(SourceScope::AcrossFiles)
            .with_tier_matching(MatchingMode::SameName)
            .with_selected_tiers(["g"])
            .with_files(["a", "b"]);
        assert!(matches!(
            build(&policy, None, &MemoryStore::new()),
            Err(crate::Error::Config(ConfigError::MissingFileMatching))
        ));
        let policy = policy.with_files(["a"]);
        assert!(matches!(
            build(&policy, None, &MemoryStore::new()),
            Err(crate::Error::Config(ConfigError::TooFewFiles(1)))
        ));
    }

    #[test]
    fn cancellation_stops_between_documents() {
        let store: MemoryStore = (0..3)
            .map(|i| Document::new(format!("f{i}"), vec![tier("a", 1), tier("b", 1)]))
            .collect();
        let policy = SelectionPolicy::new()
            .with_scope(SourceScope::SameFile)
            .with_tier_pair("a", "b")
            .with_files(["f0", "f1", "f2"]);
        let token = CancellationToken::new();
        token.cancel();
        let sink = NoProgress;
        let out = CombinationBuilder::new(&policy, &store)
            .build(None, &Progress::new(&sink), &token)
            .unwrap();
        assert!(out.cancelled);
        assert!(out.combinations.is_empty());
    }
}
