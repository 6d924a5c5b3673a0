//! Matching and end-to-end agreement benchmarks.
//!
//! # Usage
//!
//! ```bash
//! cargo bench --bench matching
//! cargo bench --bench matching --features parallel
//! ```

use accord::{
    cluster_segments, match_pairwise, AverageThreshold, Engine, FileMatching, MatchingMode, MemoryStore,
    OverlapThreshold, SelectionPolicy, SourceScope,
};
use accord_core::{Document, Segment, Tier};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const LABELS: [&str; 4] = ["point", "beat", "iconic", "deictic"];

/// A tier of `n` segments with some jitter, so that not every segment matches.
fn rater(n: usize, seed: u64) -> Vec<Segment> {
    (0..n as u64)
        .filter_map(|i| {
            let jitter = (i * 7 + seed * 13) % 300;
            let begin = i * 1000 + jitter;
            let end = begin + 400 + (i * seed) % 500;
            let label = LABELS[((i + seed) % LABELS.len() as u64) as usize];
            Segment::new(label, begin, end).ok()
        })
        .collect()
}

fn bench_pairwise_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_pairwise");
    let threshold = OverlapThreshold::default();
    for n in [100, 1_000, 5_000] {
        let (a, b) = (rater(n, 1), rater(n, 2));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| match_pairwise(black_box(&a), black_box(&b), threshold));
        });
    }
    group.finish();
}

fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_segments");
    let threshold = AverageThreshold::default();
    for raters in [3, 6] {
        let tiers: Vec<Vec<Segment>> = (0..raters).map(|r| rater(1_000, r as u64 + 1)).collect();
        let refs: Vec<&[Segment]> = tiers.iter().map(Vec::as_slice).collect();
        group.bench_with_input(BenchmarkId::from_parameter(raters), &raters, |bench, _| {
            bench.iter(|| cluster_segments(black_box(&refs), threshold));
        });
    }
    group.finish();
}

fn bench_engine_across_files(c: &mut Criterion) {
    let sessions = 50;
    let mut store = MemoryStore::new();
    let mut files = Vec::new();
    for s in 0..sessions {
        for r in 1..=2u64 {
            let path = format!("session{s}_R{r}.eaf");
            store.insert(Document::new(&path, vec![Tier::new("gesture", rater(200, r + s))]));
            files.push(path);
        }
    }
    let policy = SelectionPolicy::new()
        .with_scope(SourceScope::AcrossFiles)
        .with_tier_matching(MatchingMode::SameName)
        .with_file_matching(FileMatching::Prefix)
        .with_file_separators("_")
        .with_selected_tiers(["gesture"])
        .with_files(files)
        .with_per_tier_pair(true);
    let engine = Engine::new(policy);

    c.bench_function("engine_across_files_50_sessions", |bench| {
        bench.iter(|| engine.run(None, black_box(&store)));
    });
}

criterion_group!(
    benches,
    bench_pairwise_matching,
    bench_clustering,
    bench_engine_across_files
);
criterion_main!(benches);
