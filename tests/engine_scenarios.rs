//! End-to-end scenarios: selection, matching, tabulation and aggregation.

use accord::{
    AgreementResults, CancellationToken, CombinationBuilder, ConfigError, Diagnostic, Engine, Error, FileMatching,
    Label, MatchingMode, MemoryStore, NoProgress, OverlapThreshold, Progress, SelectionPolicy, SourceScope,
};
use accord_core::{Combination, Document, Segment, Tier, Vocabulary};

fn tier(name: &str, segs: &[(&str, u64, u64)]) -> Tier {
    Tier::new(
        name,
        segs.iter().map(|&(l, b, e)| Segment::new(l, b, e).unwrap()).collect(),
    )
}

fn plan(policy: &SelectionPolicy, current: Option<&Document>, store: &MemoryStore) -> accord::BuildOutcome {
    CombinationBuilder::new(policy, store)
        .build(current, &Progress::new(&NoProgress), &CancellationToken::new())
        .unwrap()
}

fn pair_names(c: &Combination) -> (String, String) {
    match c {
        Combination::Pairwise(p) => (p.first.tier.clone(), p.second.tier.clone()),
        Combination::MultiRater(_) => panic!("expected a pair"),
    }
}

// =============================================================================
// Tier and file selection
// =============================================================================

#[test]
fn test_prefix_seed_pairs_tiers_sharing_the_stem() {
    let doc = Document::new(
        "session.eaf",
        vec![
            tier("speakerA-ref", &[("x", 0, 10)]),
            tier("speakerA-IPA", &[("x", 0, 10)]),
            tier("speakerB-ref", &[("x", 0, 10)]),
        ],
    );
    let policy = SelectionPolicy::new()
        .with_tier_matching(MatchingMode::Prefix)
        .with_tier_separators("-")
        .with_selected_tiers(["speakerA"]);
    let built = plan(&policy, Some(&doc), &MemoryStore::new());
    assert_eq!(built.combinations.len(), 1);
    assert_eq!(
        pair_names(&built.combinations[0]),
        ("speakerA-ref".to_string(), "speakerA-IPA".to_string())
    );
}

#[test]
fn test_suffix_groups_pair_every_member() {
    let doc = Document::new(
        "session.eaf",
        vec![
            tier("R1_gesture", &[("x", 0, 10)]),
            tier("R2_gesture", &[("x", 0, 10)]),
            tier("R3_gesture", &[("x", 0, 10)]),
            tier("R1_gaze", &[("x", 0, 10)]),
        ],
    );
    let policy = SelectionPolicy::new()
        .with_tier_matching(MatchingMode::Suffix)
        .with_tier_separators("_")
        .with_selected_tiers(["R1_gesture"]);
    let built = plan(&policy, Some(&doc), &MemoryStore::new());
    let names: Vec<_> = built.combinations.iter().map(pair_names).collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|(a, b)| a.ends_with("gesture") && b.ends_with("gesture")));
}

#[test]
fn test_same_name_across_prefix_matched_files() {
    let store: MemoryStore = [
        Document::new("s1_R1.eaf", vec![tier("g", &[("x", 0, 10)])]),
        Document::new("s1_R2.eaf", vec![tier("g", &[("x", 0, 10)])]),
        Document::new("s2_R1.eaf", vec![tier("g", &[("y", 0, 10)])]),
    ]
    .into_iter()
    .collect();
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::AcrossFiles)
        .with_tier_matching(MatchingMode::SameName)
        .with_file_matching(FileMatching::Prefix)
        .with_file_separators("_")
        .with_selected_tiers(["g"])
        .with_files(["s1_R1.eaf", "s1_R2.eaf", "s2_R1.eaf"]);
    let built = plan(&policy, None, &store);

    assert_eq!(built.file_count, 3);
    assert_eq!(built.combinations.len(), 1);
    match &built.combinations[0] {
        Combination::Pairwise(p) => {
            assert_eq!(p.first.source, "s1_R1.eaf");
            assert_eq!(p.second.source, "s1_R2.eaf");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(built
        .diagnostics
        .contains(&Diagnostic::UnpairedFile { path: "s2_R1.eaf".into() }));
}

#[test]
fn test_unmatchable_file_names_are_reported() {
    let store: MemoryStore = [
        Document::new("alpha_1.eaf", vec![tier("g", &[("x", 0, 10)])]),
        Document::new("beta_2.eaf", vec![tier("g", &[("x", 0, 10)])]),
    ]
    .into_iter()
    .collect();
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::AcrossFiles)
        .with_tier_matching(MatchingMode::SameName)
        .with_file_matching(FileMatching::Prefix)
        .with_file_separators("_")
        .with_selected_tiers(["g"])
        .with_files(["alpha_1.eaf", "beta_2.eaf"]);
    match Engine::new(policy).run(None, &store) {
        Err(Error::NothingToCompare(d)) => assert_eq!(d, vec![Diagnostic::NoMatchingFiles]),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_best_effort_group_reports_partial_assignment() {
    let store: MemoryStore = [
        Document::new("s1_A.eaf", vec![tier("r1", &[("x", 0, 10)]), tier("r2", &[("x", 0, 10)])]),
        Document::new("s1_B.eaf", vec![tier("r3", &[("x", 0, 10)])]),
    ]
    .into_iter()
    .collect();
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::AcrossFiles)
        .with_group_wise(true)
        .with_file_matching(FileMatching::Prefix)
        .with_file_separators("_")
        .with_selected_tiers(["r1", "r2", "r3"])
        .with_files(["s1_A.eaf", "s1_B.eaf"]);
    let built = plan(&policy, None, &store);

    // r2 lives in the file already taken by r1
    assert_eq!(built.combinations.len(), 1);
    match &built.combinations[0] {
        Combination::MultiRater(m) => {
            let tiers: Vec<&str> = m.units.iter().map(|u| u.tier.as_str()).collect();
            assert_eq!(tiers, ["r1", "r3"]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(built.diagnostics.contains(&Diagnostic::PartialAssignment {
        files: 2,
        tiers: 3,
        assigned: 2
    }));
}

#[test]
fn test_unreadable_files_are_skipped() {
    let store: MemoryStore = [Document::new("present.eaf", vec![tier("a", &[("x", 0, 10)]), tier("b", &[])])]
        .into_iter()
        .collect();
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::SameFile)
        .with_tier_pair("a", "b")
        .with_files(["present.eaf", "missing.eaf"]);
    let out = Engine::new(policy).run(None, &store).unwrap();
    assert_eq!(out.file_count, 1);
    assert_eq!(out.completed(), 1);
    assert!(out
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::UnreadableDocument { path, .. } if path == "missing.eaf")));
}

#[test]
fn test_invalid_selections_are_config_errors() {
    let doc = Document::new("cur", vec![tier("a", &[("x", 0, 10)])]);
    let store = MemoryStore::new();
    let cases = [
        (
            SelectionPolicy::new().with_tier_matching(MatchingMode::SameName).with_selected_tiers(["a"]),
            ConfigError::SameNameWithinDocument,
        ),
        (SelectionPolicy::new().with_tier_pair("a", "a"), ConfigError::IdenticalTiers("a".into())),
        (SelectionPolicy::new().with_tier_pair("a", ""), ConfigError::MissingSecondTier),
        (
            SelectionPolicy::new().with_scope(SourceScope::AcrossFiles).with_files(["one.eaf"]),
            ConfigError::TooFewFiles(1),
        ),
    ];
    for (policy, expected) in cases {
        match Engine::new(policy).run(Some(&doc), &store) {
            Err(err @ Error::Config(_)) => {
                assert!(err.is_config());
                if let Error::Config(e) = err {
                    assert_eq!(e, expected);
                }
            }
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
    assert_eq!(OverlapThreshold::new(0.5), Err(ConfigError::ThresholdOutOfRange(0.5)));
}

// =============================================================================
// Agreement values
// =============================================================================

#[test]
fn test_identical_single_segment_pair() {
    let doc = Document::new("cur", vec![tier("A", &[("x", 0, 1000)]), tier("B", &[("x", 0, 1000)])]);
    let out = Engine::new(SelectionPolicy::new().with_tier_pair("A", "B"))
        .run(Some(&doc), &MemoryStore::new())
        .unwrap();
    let AgreementResults::Pairwise(r) = &out.results else {
        panic!("expected pairwise results");
    };
    let overall = &r.aggregate.global.overall;
    assert_eq!(overall.including.kappa.value(), Some(1.0));
    assert_eq!(overall.including.raw_agreement.value(), Some(1.0));
    assert!(!overall.excluding.kappa.is_defined());
}

#[test]
fn test_one_sided_segment_is_unmatched() {
    let doc = Document::new("cur", vec![tier("A", &[("x", 0, 1000)]), tier("B", &[("y", 5000, 6000)])]);
    let out = Engine::new(SelectionPolicy::new().with_tier_pair("A", "B"))
        .run(Some(&doc), &MemoryStore::new())
        .unwrap();
    let AgreementResults::Pairwise(r) = &out.results else {
        panic!("expected pairwise results");
    };
    let table = &r.combinations[0].table;
    assert_eq!(table.get(&Label::observed("x"), &Label::Unmatched), 1);
    assert_eq!(table.get(&Label::Unmatched, &Label::observed("y")), 1);
    assert_eq!(r.aggregate.global.overall.including.raw_agreement.value(), Some(0.0));
}

#[test]
fn test_overlap_below_threshold_does_not_match() {
    // overlap 600 of the longer 1000: matches at 60%, not at 61%
    let doc = Document::new("cur", vec![tier("A", &[("x", 0, 1000)]), tier("B", &[("x", 400, 1000)])]);
    let run = |percent| {
        let policy = SelectionPolicy::new()
            .with_tier_pair("A", "B")
            .with_overlap(OverlapThreshold::from_percent(percent).unwrap());
        let out = Engine::new(policy).run(Some(&doc), &MemoryStore::new()).unwrap();
        match out.results {
            AgreementResults::Pairwise(r) => r.combinations[0].matches.len(),
            AgreementResults::Groups(_) => panic!("expected pairwise results"),
        }
    };
    assert_eq!(run(60), 1);
    assert_eq!(run(61), 0);
}

#[test]
fn test_per_tier_pair_totals_merge_across_files() {
    let store: MemoryStore = ["f1.eaf", "f2.eaf"]
        .into_iter()
        .map(|p| {
            Document::new(
                p,
                vec![
                    tier("A", &[("x", 0, 10)]),
                    tier("B", &[("x", 0, 10)]),
                ],
            )
        })
        .collect();
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::SameFile)
        .with_tier_pair("A", "B")
        .with_files(["f1.eaf", "f2.eaf"])
        .with_per_tier_pair(true);
    let out = Engine::new(policy).run(None, &store).unwrap();
    let AgreementResults::Pairwise(r) = &out.results else {
        panic!("expected pairwise results");
    };
    assert_eq!(r.combinations.len(), 2);
    let keys: Vec<&String> = r.aggregate.per_tier_pair.keys().collect();
    assert_eq!(keys, ["A:B"]);
    assert_eq!(r.aggregate.per_tier_pair["A:B"].table.total(), 4);
    assert_eq!(r.aggregate.global.table.total(), 4);
}

#[test]
fn test_three_identical_raters_agree_fully() {
    let segs = [("x", 0, 10), ("y", 20, 30), ("x", 40, 50)];
    let doc = Document::new("cur", vec![tier("r1", &segs), tier("r2", &segs), tier("r3", &segs)]);
    let policy = SelectionPolicy::new()
        .with_group_wise(true)
        .with_selected_tiers(["r1", "r2", "r3"]);
    let out = Engine::new(policy).run(Some(&doc), &MemoryStore::new()).unwrap();
    let AgreementResults::Groups(g) = &out.results else {
        panic!("expected group results");
    };
    let group = &g.groups[0];
    assert_eq!(group.clusters.len(), 3);
    assert_eq!(group.including.result.kappa.value(), Some(1.0));
    assert_eq!(group.excluding.result.kappa.value(), Some(1.0));
}

#[test]
fn test_vocabulary_outsider_counts_as_unmatched() {
    let vocab = Vocabulary {
        name: "gestures".into(),
        values: vec!["x".into(), "y".into()],
    };
    let doc = Document::new(
        "cur",
        vec![
            tier("r1", &[("x", 0, 10)]).with_vocabulary(vocab.clone()),
            tier("r2", &[("z", 0, 10)]).with_vocabulary(vocab),
        ],
    );
    let policy = SelectionPolicy::new()
        .with_group_wise(true)
        .with_selected_tiers(["r1", "r2"]);
    let out = Engine::new(policy).run(Some(&doc), &MemoryStore::new()).unwrap();
    assert!(out.diagnostics.contains(&Diagnostic::UnknownValue {
        value: "z".into(),
        tier: "r2".into()
    }));
    let AgreementResults::Groups(g) = &out.results else {
        panic!("expected group results");
    };
    assert_eq!(g.groups[0].including_matrix.rows(), [vec![1, 0, 1]]);
}

#[test]
fn test_results_keep_combination_order() {
    let tiers: Vec<Tier> = (0..6)
        .map(|i| tier(&format!("s{i}-t"), &[("x", 0, 10 + i as u64)]))
        .chain((0..6).map(|i| tier(&format!("s{i}-u"), &[("x", 0, 10)])))
        .collect();
    let doc = Document::new("cur", tiers);
    let seeds: Vec<String> = (0..6).map(|i| format!("s{i}-t")).collect();
    let policy = SelectionPolicy::new()
        .with_tier_matching(MatchingMode::Prefix)
        .with_tier_separators("-")
        .with_selected_tiers(seeds);
    let out = Engine::new(policy).run(Some(&doc), &MemoryStore::new()).unwrap();
    let AgreementResults::Pairwise(r) = &out.results else {
        panic!("expected pairwise results");
    };
    let firsts: Vec<&str> = r.combinations.iter().map(|a| a.combination.first.tier.as_str()).collect();
    assert_eq!(firsts, ["s0-t", "s1-t", "s2-t", "s3-t", "s4-t", "s5-t"]);
}
