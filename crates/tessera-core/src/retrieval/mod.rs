//! Hybrid Retrieval Scorer
//!
//! Ranks journal entries against a query by a weighted combination of
//! embedding similarity, recency, entity overlap, and mood similarity.
//! Similarity search is a deliberate linear scan - a single user's corpus
//! is hundreds to low thousands of entries, not a vector database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::entry::{EntityTag, Entry, in_category};
use crate::scoring::{embedding_similarity, entity_match_score, mood_similarity, recency_score};

// ============================================================================
// QUERY & RESULT TYPES
// ============================================================================

/// A retrieval query over the entry collection
#[derive(Debug, Clone, Default)]
pub struct RetrievalQuery<'a> {
    /// Query embedding, if the external embedding step produced one
    pub embedding: Option<&'a [f32]>,
    /// Entities extracted from the query text
    pub entities: &'a [EntityTag],
    /// Current mood, if known
    pub mood: Option<f64>,
    /// Restrict candidates to one category
    pub category: Option<&'a str>,
}

/// Per-component scores kept alongside the combined score so callers can
/// explain why an entry ranked where it did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Embedding cosine similarity
    pub vector: f64,
    /// Recency decay score
    pub recency: f64,
    /// Entity overlap score
    pub entity: f64,
    /// Mood similarity score
    pub mood: f64,
}

/// One ranked entry with its score breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Id of the ranked entry
    pub entry_id: String,
    /// Weighted combination of the component scores
    pub combined: f64,
    /// Component scores
    pub breakdown: ScoreBreakdown,
}

// ============================================================================
// SCORER
// ============================================================================

/// Rank entries against `query`, best first.
///
/// Candidates whose combined score is at or below the configured floor
/// are discarded. The sort is stable, so entries with equal scores keep
/// their original collection order and repeated calls over the same
/// collection are identical.
pub fn hybrid_retrieve(
    query: &RetrievalQuery<'_>,
    entries: &[Entry],
    config: &RetrievalConfig,
    now: DateTime<Utc>,
) -> Vec<RankedEntry> {
    let weights = &config.weights;

    let mut ranked: Vec<RankedEntry> = in_category(entries, query.category)
        .map(|entry| {
            let breakdown = ScoreBreakdown {
                vector: embedding_similarity(query.embedding, entry.embedding.as_deref()),
                recency: recency_score(entry.timestamp(), now, config.recency_half_life_days),
                entity: entity_match_score(query.entities, &entry.entities),
                mood: mood_similarity(query.mood, entry.mood_score),
            };
            let combined = breakdown.vector * weights.vector
                + breakdown.recency * weights.recency
                + breakdown.entity * weights.entity
                + breakdown.mood * weights.mood;
            RankedEntry {
                entry_id: entry.id.clone(),
                combined,
                breakdown,
            }
        })
        .filter(|r| r.combined > config.min_combined_score)
        .collect();

    ranked.sort_by(|a, b| {
        b.combined
            .partial_cmp(&a.combined)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(config.top_k);

    tracing::debug!(
        candidates = entries.len(),
        returned = ranked.len(),
        "hybrid retrieval complete"
    );

    ranked
}

// ============================================================================
// TESTS
// ============================================================================
