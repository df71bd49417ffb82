//! Activity Sentiment Analyzer
//!
//! Compares the average mood around each recurring entity against the
//! scope-wide baseline. Tags of type activity, place, person, event, and
//! media are the analysis subjects; goals, topics, and self-observations
//! carry too little situational signal to compare against a baseline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ActivityConfig;
use crate::entry::{EntityTag, EntityType, Entry, mood_bearing};

/// Entity types compared against the mood baseline
const SUBJECT_TYPES: [EntityType; 5] = [
    EntityType::Activity,
    EntityType::Place,
    EntityType::Person,
    EntityType::Event,
    EntityType::Media,
];

// ============================================================================
// TYPES
// ============================================================================

/// Direction of a mood effect relative to baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    fn classify(delta: f64, threshold: f64) -> Self {
        if delta > threshold {
            Sentiment::Positive
        } else if delta < -threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Mood effect of one recurring entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySentiment {
    /// The entity, canonical `@type:name` form
    pub entity: String,
    /// Entity name without the type prefix
    pub entity_name: String,
    /// Entity type
    pub entity_type: EntityType,
    /// Average mood over mood-bearing entries carrying the tag
    pub avg_mood: f64,
    /// Scope-wide baseline mood
    pub baseline_mood: f64,
    /// `avg_mood - baseline_mood`
    pub mood_delta: f64,
    /// Delta as a percentage of baseline; 0 when the baseline is 0
    pub mood_delta_percent: f64,
    /// Mood-bearing entries carrying the tag
    pub entry_count: usize,
    /// Effect direction
    pub sentiment: Sentiment,
    /// Presentable fact string, only for strong or frequent effects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_text: Option<String>,
    /// Ids of the most recent contributing entries, newest first
    pub recent_entries: Vec<String>,
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Compute per-entity mood effects for `entries`, optionally scoped to a
/// category.
///
/// Tags seen on fewer than `config.min_entries` mood-bearing entries are
/// skipped. Output is ordered by `|mood_delta|` descending - largest
/// effect sizes first - with ties broken by entity string.
pub fn activity_sentiment(
    entries: &[Entry],
    category: Option<&str>,
    config: &ActivityConfig,
) -> Vec<ActivitySentiment> {
    let scoped: Vec<&Entry> = mood_bearing(entries, category).collect();
    if scoped.is_empty() {
        return Vec::new();
    }

    let baseline: f64 = scoped
        .iter()
        .filter_map(|e| e.mood_score)
        .sum::<f64>()
        / scoped.len() as f64;

    // Tag -> contributing (timestamp, id, mood), one per carrying entry
    let mut per_tag: HashMap<&EntityTag, Vec<(&Entry, f64)>> = HashMap::new();
    for entry in &scoped {
        let Some(mood) = entry.mood_score else { continue };
        for tag in &entry.entities {
            if SUBJECT_TYPES.contains(&tag.entity_type) {
                per_tag.entry(tag).or_default().push((entry, mood));
            }
        }
    }

    let mut results: Vec<ActivitySentiment> = per_tag
        .into_iter()
        .filter(|(_, hits)| hits.len() >= config.min_entries)
        .map(|(tag, mut hits)| {
            let entry_count = hits.len();
            let avg_mood = hits.iter().map(|(_, m)| m).sum::<f64>() / entry_count as f64;
            let mood_delta = avg_mood - baseline;
            let mood_delta_percent = if baseline.abs() > f64::EPSILON {
                mood_delta / baseline * 100.0
            } else {
                0.0
            };
            let sentiment = Sentiment::classify(mood_delta, config.sentiment_delta);

            hits.sort_by_key(|(e, _)| std::cmp::Reverse(e.timestamp()));
            let recent_entries = hits
                .iter()
                .take(config.max_recent_entries)
                .map(|(e, _)| e.id.clone())
                .collect();

            let insight_text = insight_for(
                tag,
                sentiment,
                mood_delta_percent,
                entry_count,
                config,
            );

            ActivitySentiment {
                entity: tag.to_string(),
                entity_name: tag.name.clone(),
                entity_type: tag.entity_type,
                avg_mood,
                baseline_mood: baseline,
                mood_delta,
                mood_delta_percent,
                entry_count,
                sentiment,
                insight_text,
                recent_entries,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.mood_delta
            .abs()
            .partial_cmp(&a.mood_delta.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.entity.cmp(&b.entity))
    });

    tracing::debug!(
        baseline,
        subjects = results.len(),
        "activity sentiment computed"
    );

    results
}

/// Build the presentable fact string for a strong or frequent effect
fn insight_for(
    tag: &EntityTag,
    sentiment: Sentiment,
    delta_percent: f64,
    entry_count: usize,
    config: &ActivityConfig,
) -> Option<String> {
    if delta_percent > config.insight_delta_percent {
        return Some(format!(
            "Your mood runs {:.0}% above your usual when {} comes up ({} entries).",
            delta_percent, tag.name, entry_count
        ));
    }
    if delta_percent < -config.insight_delta_percent {
        return Some(format!(
            "Your mood runs {:.0}% below your usual when {} comes up ({} entries).",
            delta_percent.abs(),
            tag.name,
            entry_count
        ));
    }
    if entry_count >= config.frequency_floor && sentiment == Sentiment::Neutral {
        return Some(format!(
            "{} shows up often ({} entries) without moving your mood much either way.",
            tag.name, entry_count
        ));
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryType;
    use chrono::{TimeZone, Utc};

    fn entry(day: u32, tags: &[&str], mood: f64) -> Entry {
        Entry::new("…", "personal", EntryType::Reflection)
            .with_tags(tags.iter().map(|t| t.to_string()).collect())
            .with_mood(mood)
            .recorded_at(Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap())
    }

    /// Corpus with baseline 0.5: yoga entries at [0.8, 0.9, 0.85] plus
    /// plain entries pulling the overall mean to 0.5.
    fn yoga_corpus() -> Vec<Entry> {
        vec![
            entry(1, &["@activity:yoga"], 0.8),
            entry(2, &["@activity:yoga"], 0.9),
            entry(3, &["@activity:yoga"], 0.85),
            entry(4, &[], 0.1),
            entry(5, &[], 0.2),
            entry(6, &[], 0.15),
        ]
    }

    #[test]
    fn test_yoga_reads_positive_against_baseline() {
        let results = activity_sentiment(&yoga_corpus(), None, &ActivityConfig::default());
        assert_eq!(results.len(), 1);
        let yoga = &results[0];
        assert_eq!(yoga.entity, "@activity:yoga");
        assert_eq!(yoga.sentiment, Sentiment::Positive);
        assert_eq!(yoga.entry_count, 3);
        assert!((yoga.baseline_mood - 0.5).abs() < 1e-9);
        assert!((yoga.mood_delta - 0.35).abs() < 1e-9);
        assert!(yoga.insight_text.is_some());
    }

    #[test]
    fn test_min_entry_guard() {
        let entries = vec![entry(1, &["@place:office"], 0.2), entry(2, &[], 0.5)];
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert!(results.is_empty(), "single-occurrence tags must be skipped");
    }

    #[test]
    fn test_non_subject_types_ignored() {
        let entries = vec![
            entry(1, &["@goal:marathon"], 0.9),
            entry(2, &["@goal:marathon"], 0.9),
        ];
        assert!(activity_sentiment(&entries, None, &ActivityConfig::default()).is_empty());
    }

    #[test]
    fn test_negative_sentiment() {
        let entries = vec![
            entry(1, &["@person:boss"], 0.2),
            entry(2, &["@person:boss"], 0.25),
            entry(3, &[], 0.8),
            entry(4, &[], 0.8),
        ];
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert_eq!(results[0].sentiment, Sentiment::Negative);
        assert!(results[0].mood_delta < -0.1);
        assert!(results[0].insight_text.is_some());
    }

    #[test]
    fn test_neutral_without_insight_below_frequency_floor() {
        let entries = vec![
            entry(1, &["@place:home"], 0.52),
            entry(2, &["@place:home"], 0.48),
            entry(3, &[], 0.5),
        ];
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert_eq!(results[0].sentiment, Sentiment::Neutral);
        assert!(results[0].insight_text.is_none());
    }

    #[test]
    fn test_frequent_neutral_gets_frequency_insight() {
        let mut entries: Vec<Entry> = (1..=6)
            .map(|d| entry(d, &["@place:home"], 0.5))
            .collect();
        entries.push(entry(7, &[], 0.5));
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert_eq!(results[0].sentiment, Sentiment::Neutral);
        assert!(results[0].insight_text.is_some());
    }

    #[test]
    fn test_sorted_by_effect_size() {
        let entries = vec![
            entry(1, &["@place:office"], 0.45),
            entry(2, &["@place:office"], 0.55),
            entry(3, &["@activity:running"], 0.95),
            entry(4, &["@activity:running"], 0.9),
            entry(5, &[], 0.2),
            entry(6, &[], 0.2),
        ];
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert_eq!(results[0].entity, "@activity:running");
    }

    #[test]
    fn test_recent_entries_newest_first_capped() {
        let entries: Vec<Entry> = (1..=5)
            .map(|d| entry(d, &["@activity:yoga"], 0.8))
            .collect();
        let expected: Vec<String> = vec![
            entries[4].id.clone(),
            entries[3].id.clone(),
            entries[2].id.clone(),
        ];
        let results = activity_sentiment(&entries, None, &ActivityConfig::default());
        assert_eq!(results[0].recent_entries, expected);
    }

    #[test]
    fn test_category_scoping() {
        let mut work = entry(1, &["@person:boss"], 0.2);
        work.category = "work".to_string();
        let mut work2 = entry(2, &["@person:boss"], 0.3);
        work2.category = "work".to_string();
        let entries = vec![work, work2, entry(3, &["@person:boss"], 0.9)];

        let personal = activity_sentiment(&entries, Some("personal"), &ActivityConfig::default());
        assert!(personal.is_empty(), "only one boss entry in personal scope");

        let work_scope = activity_sentiment(&entries, Some("work"), &ActivityConfig::default());
        assert_eq!(work_scope.len(), 1);
        assert_eq!(work_scope[0].entry_count, 2);
    }

    #[test]
    fn test_empty_scope() {
        assert!(activity_sentiment(&[], None, &ActivityConfig::default()).is_empty());
    }
}
