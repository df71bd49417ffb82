//! Mood Trigger Detector
//!
//! Scans mood-bearing entries in chronological order and credits the
//! structured tags of the earlier entry whenever the mood swings sharply
//! between consecutive entries. Tags that precede repeated drops or
//! boosts surface as precursors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::TriggerConfig;
use crate::entry::{EntityTag, Entry, mood_bearing};

// ============================================================================
// TYPES
// ============================================================================

/// A tag that repeatedly precedes mood swings in one direction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrigger {
    /// The precursor tag, canonical `@type:name` form
    pub entity: String,
    /// Swings the tag preceded
    pub count: usize,
    /// Mean mood change across those swings (signed)
    pub avg_change: f64,
}

/// Drop and boost precursors, detected independently
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTriggers {
    /// Tags preceding sharp mood drops
    pub drop_precursors: Vec<MoodTrigger>,
    /// Tags preceding sharp mood boosts
    pub boost_precursors: Vec<MoodTrigger>,
}

// ============================================================================
// DETECTOR
// ============================================================================

/// Detect tags that precede sharp mood swings.
///
/// Entries are ordered chronologically by their authoritative timestamp;
/// for each consecutive pair the delta `curr - prev` is compared against
/// the configured swing threshold and every structured tag on `prev` is
/// credited. Precursors seen fewer than `min_count` times are dropped,
/// and each direction returns at most `top_n` tags ordered by count.
pub fn mood_triggers(
    entries: &[Entry],
    category: Option<&str>,
    config: &TriggerConfig,
) -> MoodTriggers {
    let mut scoped: Vec<&Entry> = mood_bearing(entries, category).collect();
    scoped.sort_by_key(|e| e.timestamp());

    let mut drops: HashMap<&EntityTag, (usize, f64)> = HashMap::new();
    let mut boosts: HashMap<&EntityTag, (usize, f64)> = HashMap::new();

    for pair in scoped.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let (Some(prev_mood), Some(curr_mood)) = (prev.mood_score, curr.mood_score) else {
            continue;
        };
        let delta = curr_mood - prev_mood;

        let accumulator = if delta < -config.swing {
            &mut drops
        } else if delta > config.swing {
            &mut boosts
        } else {
            continue;
        };

        for tag in &prev.entities {
            let slot = accumulator.entry(tag).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += delta;
        }
    }

    MoodTriggers {
        drop_precursors: rank(drops, config),
        boost_precursors: rank(boosts, config),
    }
}

/// Keep recurring precursors, order them, and cap the list
fn rank(accumulator: HashMap<&EntityTag, (usize, f64)>, config: &TriggerConfig) -> Vec<MoodTrigger> {
    let mut triggers: Vec<MoodTrigger> = accumulator
        .into_iter()
        .filter(|(_, (count, _))| *count >= config.min_count)
        .map(|(tag, (count, total_change))| MoodTrigger {
            entity: tag.to_string(),
            count,
            avg_change: total_change / count as f64,
        })
        .collect();

    triggers.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                b.avg_change
                    .abs()
                    .partial_cmp(&a.avg_change.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.entity.cmp(&b.entity))
    });
    triggers.truncate(config.top_n);
    triggers
}

// ============================================================================
// TESTS
// ============================================================================
