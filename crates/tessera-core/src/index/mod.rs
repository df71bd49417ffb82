//! Entity Index Builder
//!
//! Scans entries and aggregates one record per distinct structured tag:
//! occurrence count, most recent mention, and average mood over the
//! mood-bearing entries carrying the tag. Recomputed on demand from the
//! current entry set; never incrementally maintained or persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{EntityTag, EntityType, Entry};

// ============================================================================
// INDEX RECORD
// ============================================================================

/// Aggregate statistics for one structured tag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIndexRecord {
    /// The structured tag
    pub tag: EntityTag,
    /// Occurrences across all entries in scope
    pub count: usize,
    /// Most recent timestamp among occurrences
    pub last_mentioned: DateTime<Utc>,
    /// Mean mood over mood-bearing entries carrying the tag, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_mood: Option<f64>,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build the entity index over `entries`, optionally restricted to one
/// entity type.
///
/// Output is sorted by `count` descending; ties break by tag name so
/// repeated builds over the same entries are identical.
pub fn build_entity_index(entries: &[Entry], filter: Option<EntityType>) -> Vec<EntityIndexRecord> {
    struct Accumulator {
        count: usize,
        last_mentioned: DateTime<Utc>,
        mood_total: f64,
        mood_samples: usize,
    }

    let mut accumulators: HashMap<EntityTag, Accumulator> = HashMap::new();

    for entry in entries {
        let timestamp = entry.timestamp();
        let mood = entry.is_mood_bearing().then(|| entry.mood_score).flatten();

        for tag in &entry.entities {
            if filter.is_some_and(|t| tag.entity_type != t) {
                continue;
            }
            let acc = accumulators.entry(tag.clone()).or_insert(Accumulator {
                count: 0,
                last_mentioned: timestamp,
                mood_total: 0.0,
                mood_samples: 0,
            });
            acc.count += 1;
            acc.last_mentioned = acc.last_mentioned.max(timestamp);
            if let Some(mood) = mood {
                acc.mood_total += mood;
                acc.mood_samples += 1;
            }
        }
    }

    let mut records: Vec<EntityIndexRecord> = accumulators
        .into_iter()
        .map(|(tag, acc)| EntityIndexRecord {
            tag,
            count: acc.count,
            last_mentioned: acc.last_mentioned,
            avg_mood: (acc.mood_samples > 0).then(|| acc.mood_total / acc.mood_samples as f64),
        })
        .collect();

    records.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.tag.to_string().cmp(&b.tag.to_string()))
    });

    records
}

// ============================================================================
// TESTS
// ============================================================================
