//! Tessera Retrieval Benchmarks
//!
//! Benchmarks for the scoring primitives and the hybrid retrieval scan
//! using Criterion. Run with: cargo bench -p tessera-core

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tessera_core::{
    EntityTag, Entry, EntryType, RetrievalConfig, RetrievalQuery, build_entity_index,
    cosine_similarity, hybrid_retrieve,
};

fn synthetic_embedding(seed: usize, dimensions: usize) -> Vec<f32> {
    (0..dimensions)
        .map(|j| ((seed * dimensions + j) as f32).sin())
        .collect()
}

/// A year of entries with rotating tags, moods, and embeddings
fn synthetic_corpus(size: usize) -> Vec<Entry> {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let tags = [
        "@activity:running",
        "@activity:yoga",
        "@person:alex",
        "@place:office",
        "@media:film club",
    ];
    (0..size)
        .map(|i| {
            Entry::new("synthetic entry", "personal", EntryType::Reflection)
                .with_tags(vec![tags[i % tags.len()].to_string()])
                .with_mood((i % 10) as f64 / 10.0)
                .with_embedding(synthetic_embedding(i, 768))
                .recorded_at(start + Duration::hours(i as i64 * 8))
        })
        .collect()
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a = synthetic_embedding(1, 768);
    let b = synthetic_embedding(2, 768);

    c.bench_function("cosine_768d", |bencher| {
        bencher.iter(|| black_box(cosine_similarity(&a, &b)))
    });
}

fn bench_hybrid_retrieve(c: &mut Criterion) {
    let corpus = synthetic_corpus(1000);
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let embedding = synthetic_embedding(7, 768);
    let entities = vec![EntityTag::parse("@activity:running").unwrap()];
    let config = RetrievalConfig::default();

    c.bench_function("hybrid_retrieve_1k", |bencher| {
        bencher.iter(|| {
            let query = RetrievalQuery {
                embedding: Some(&embedding),
                entities: &entities,
                mood: Some(0.4),
                category: None,
            };
            black_box(hybrid_retrieve(&query, &corpus, &config, now))
        })
    });
}

fn bench_entity_index(c: &mut Criterion) {
    let corpus = synthetic_corpus(1000);

    c.bench_function("entity_index_1k", |bencher| {
        bencher.iter(|| black_box(build_entity_index(&corpus, None)))
    });
}

criterion_group!(
    benches,
    bench_cosine_similarity,
    bench_hybrid_retrieve,
    bench_entity_index
);
criterion_main!(benches);
