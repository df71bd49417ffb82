//! End-to-end retrieval: entries in, ranked explainable results out

use chrono::Duration;
use tessera_core::prelude::*;
use tessera_e2e::fixtures::{anchor, embedding, reflection};

#[test]
fn ranked_results_carry_breakdowns_and_respect_top_k() {
    let mut entries: Vec<Entry> = (0..30)
        .map(|i| {
            reflection(i, &["@activity:running"], 0.6)
                .with_embedding(embedding(i as usize))
        })
        .collect();
    entries.push(reflection(30, &["@person:alex"], 0.4).with_embedding(embedding(99)));

    let config = EngineConfig::default();
    let now = anchor() + Duration::days(31);
    let query_embedding = embedding(99);
    let entities = vec![EntityTag::parse("@person:alex").unwrap()];
    let query = RetrievalQuery {
        embedding: Some(&query_embedding),
        entities: &entities,
        mood: Some(0.4),
        category: None,
    };

    let ranked = hybrid_retrieve(&query, &entries, &config.retrieval, now);

    assert!(ranked.len() <= config.retrieval.top_k);
    // The alex entry matches on every component and must win
    let top = &ranked[0];
    assert_eq!(top.entry_id, entries.last().unwrap().id);
    assert!((top.breakdown.vector - 1.0).abs() < 1e-5);
    assert!((top.breakdown.entity - 1.0).abs() < 1e-9);
    assert!((top.breakdown.mood - 1.0).abs() < 1e-9);
    // Every result explains itself
    for r in &ranked {
        assert!(r.combined > 0.1);
        assert!(r.breakdown.recency > 0.0);
    }
}

#[test]
fn category_scoping_and_weights_are_respected() {
    let mut work = reflection(0, &[], 0.5);
    work.category = "work".to_string();
    let entries = vec![work, reflection(1, &[], 0.5)];

    let mut config = EngineConfig::default();
    // Recency-only weighting
    config.retrieval.weights = RetrievalWeights {
        vector: 0.0,
        recency: 1.0,
        entity: 0.0,
        mood: 0.0,
    };

    let query = RetrievalQuery {
        category: Some("work"),
        ..Default::default()
    };
    let ranked = hybrid_retrieve(&query, &entries, &config.retrieval, anchor() + Duration::days(2));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].entry_id, entries[0].id);
    assert!((ranked[0].combined - ranked[0].breakdown.recency).abs() < 1e-9);
}

#[test]
fn entity_index_supports_retrieval_context() {
    let entries = vec![
        reflection(0, &["@person:sam", "@activity:climbing"], 0.8),
        reflection(1, &["@person:sam"], 0.6),
        reflection(2, &["@person:sam"], 0.7),
    ];

    let index = build_entity_index(&entries, None);
    assert_eq!(index[0].tag.to_string(), "@person:sam");
    assert_eq!(index[0].count, 3);
    assert_eq!(index[0].last_mentioned, entries[2].timestamp());
    assert!((index[0].avg_mood.unwrap() - 0.7).abs() < 1e-9);
}
