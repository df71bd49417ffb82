//! Similarity & Scoring Primitives
//!
//! Pure functions shared by the hybrid retrieval scorer and the pattern
//! analyzers. No state, no I/O; "now" is always passed in so callers and
//! tests control the clock.

use chrono::{DateTime, Utc};

use crate::entry::EntityTag;

/// When either side of a mood comparison is missing, score neutral
const NEUTRAL_MOOD_SIMILARITY: f64 = 0.5;

/// Credit for a same-typed tag whose name shares a whole token
const PARTIAL_MATCH_CREDIT: f64 = 0.5;

// ============================================================================
// VECTOR SIMILARITY
// ============================================================================

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 when the lengths differ or either norm is zero. Symmetric.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator > 0.0 {
        dot_product / denominator
    } else {
        0.0
    }
}

/// Cosine similarity over optional embeddings; absence scores 0.0
#[inline]
pub fn embedding_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => cosine_similarity(a, b),
        _ => 0.0,
    }
}

// ============================================================================
// RECENCY
// ============================================================================

/// Exponential recency decay: `0.5 ^ (age_days / half_life_days)`.
///
/// 1.0 at zero age, 0.5 at exactly one half-life, strictly decreasing.
/// Timestamps in the future of `now` clamp to age zero.
pub fn recency_score(timestamp: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 0.0;
    }
    let age_seconds = (now - timestamp).num_seconds().max(0) as f64;
    let age_days = age_seconds / 86_400.0;
    0.5_f64.powf(age_days / half_life_days)
}

// ============================================================================
// ENTITY MATCH
// ============================================================================

/// Score the overlap between query entities and an entry's entities.
///
/// Each query entity earns 1.0 for an exact match, or 0.5 when a tag of
/// the same type shares a whole name token (token-boundary matching, so
/// "al" never matches "california"). The sum is normalized by the number
/// of query entities and capped at 1.0. Empty on either side scores 0.0.
pub fn entity_match_score(query_entities: &[EntityTag], entry_entities: &[EntityTag]) -> f64 {
    if query_entities.is_empty() || entry_entities.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for query in query_entities {
        let mut best = 0.0_f64;
        for candidate in entry_entities {
            if candidate == query {
                best = 1.0;
                break;
            }
            if candidate.entity_type == query.entity_type && shares_token(query, candidate) {
                best = best.max(PARTIAL_MATCH_CREDIT);
            }
        }
        total += best;
    }

    (total / query_entities.len() as f64).min(1.0)
}

/// Whether two tags share at least one whole name token
fn shares_token(a: &EntityTag, b: &EntityTag) -> bool {
    a.name_tokens()
        .any(|token| b.name_tokens().any(|other| other == token))
}

// ============================================================================
// MOOD SIMILARITY
// ============================================================================

/// Score how close two mood values are: `1 - |a - b|`.
///
/// Neutral 0.5 when either side is absent.
pub fn mood_similarity(query_mood: Option<f64>, entry_mood: Option<f64>) -> f64 {
    match (query_mood, entry_mood) {
        (Some(q), Some(e)) => 1.0 - (q - e).abs(),
        _ => NEUTRAL_MOOD_SIMILARITY,
    }
}

// ============================================================================
// TESTS
// ============================================================================
