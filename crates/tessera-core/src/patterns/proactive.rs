//! Proactive Context Generator
//!
//! Composes the analyzer outputs into prioritized, typed insight records
//! for a given "now" context: entity history, day-of-week flags,
//! mood-based suggestions, and contradictions between the current mood
//! and an entity's history. Produces structured facts only; phrasing
//! them in natural language belongs to an external collaborator.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::EngineConfig;
use crate::entry::{EntityTag, Entry};
use crate::patterns::activity::{ActivitySentiment, Sentiment, activity_sentiment};
use crate::patterns::temporal::temporal_patterns;

// ============================================================================
// TYPES
// ============================================================================

/// What kind of fact an insight carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// History of an entity mentioned in the current entry
    EntityHistory,
    /// Today matches a flagged best/worst day
    DayOfWeek,
    /// A historically mood-lifting activity, offered on a low mood
    MoodSuggestion,
    /// Current mood contradicts an entity's history
    Contradiction,
}

/// Priority rank; lower sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Support,
    Suggestion,
    Awareness,
    Curiosity,
    Encouragement,
    Celebration,
}

/// A prioritized, typed fact surfaced ahead of user interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProactiveInsight {
    /// Fact family
    pub kind: InsightKind,
    /// Priority rank; callers sort and truncate by this
    pub priority: InsightPriority,
    /// The entity the fact is about, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Presentable fact string
    pub message: String,
    /// The structured facts behind the message
    pub data: serde_json::Value,
}

/// The current-entry context insights are generated against
#[derive(Debug, Clone, Default)]
pub struct CurrentContext<'a> {
    /// Mood of the entry being written, if scored
    pub mood: Option<f64>,
    /// Entities extracted from the entry being written
    pub entities: &'a [EntityTag],
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Generate prioritized insights for the current context.
///
/// Insight families are generated in a fixed order, then stable-sorted by
/// priority, so equal-priority insights keep their generation order. No
/// cap is applied here; callers truncate as needed.
pub fn proactive_context(
    entries: &[Entry],
    category: Option<&str>,
    context: &CurrentContext<'_>,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Vec<ProactiveInsight> {
    let sentiments = activity_sentiment(entries, category, &config.activity);
    let temporal = temporal_patterns(entries, category, config);

    let mut insights = Vec::new();

    // 1. Entity history for entities in the current entry
    for tag in context.entities {
        let Some(record) = find_sentiment(&sentiments, tag) else { continue };
        if record.entry_count < config.activity.min_entries {
            continue;
        }
        let Some(message) = record.insight_text.clone() else { continue };
        let priority = if record.sentiment == Sentiment::Positive {
            InsightPriority::Encouragement
        } else {
            InsightPriority::Awareness
        };
        insights.push(ProactiveInsight {
            kind: InsightKind::EntityHistory,
            priority,
            entity: Some(record.entity.clone()),
            message,
            data: json!({
                "avgMood": record.avg_mood,
                "baselineMood": record.baseline_mood,
                "moodDelta": record.mood_delta,
                "entryCount": record.entry_count,
            }),
        });
    }

    // 2. Day-of-week match against the flagged best/worst day
    let today = now.with_timezone(&config.tz_offset).weekday();
    if let Some(worst) = &temporal.worst_day {
        if worst.day == today {
            insights.push(ProactiveInsight {
                kind: InsightKind::DayOfWeek,
                priority: InsightPriority::Support,
                entity: None,
                message: format!(
                    "{:?}s have been your hardest day (avg mood {:.2}). Be gentle with yourself today.",
                    worst.day, worst.avg_mood
                ),
                data: json!({ "day": worst.day.to_string(), "avgMood": worst.avg_mood, "count": worst.count }),
            });
        }
    }
    if let Some(best) = &temporal.best_day {
        if best.day == today {
            insights.push(ProactiveInsight {
                kind: InsightKind::DayOfWeek,
                priority: InsightPriority::Celebration,
                entity: None,
                message: format!(
                    "{:?}s tend to be your best day (avg mood {:.2}).",
                    best.day, best.avg_mood
                ),
                data: json!({ "day": best.day.to_string(), "avgMood": best.avg_mood, "count": best.count }),
            });
        }
    }

    // 3. Mood-based suggestions when the current mood is low
    if context.mood.is_some_and(|m| m < config.proactive.suggestion_mood) {
        let lifts = sentiments
            .iter()
            .filter(|s| {
                s.sentiment == Sentiment::Positive
                    && s.mood_delta_percent > config.proactive.suggestion_delta_percent
            })
            .take(config.proactive.max_suggestions);
        for lift in lifts {
            insights.push(ProactiveInsight {
                kind: InsightKind::MoodSuggestion,
                priority: InsightPriority::Suggestion,
                entity: Some(lift.entity.clone()),
                message: format!(
                    "{} has lifted your mood before ({:.0}% above your usual).",
                    lift.entity_name, lift.mood_delta_percent
                ),
                data: json!({
                    "avgMood": lift.avg_mood,
                    "moodDeltaPercent": lift.mood_delta_percent,
                    "entryCount": lift.entry_count,
                }),
            });
        }
    }

    // 4. Contradictions between the current mood and an entity's history
    if let Some(current_mood) = context.mood {
        for tag in context.entities {
            let Some(record) = find_sentiment(&sentiments, tag) else { continue };
            if record.entry_count < config.proactive.contradiction_min_entries {
                continue;
            }
            let gap = (current_mood - record.avg_mood).abs();
            if gap > config.proactive.contradiction_gap {
                insights.push(ProactiveInsight {
                    kind: InsightKind::Contradiction,
                    priority: InsightPriority::Curiosity,
                    entity: Some(record.entity.clone()),
                    message: format!(
                        "Today feels different: {} usually lands around {:.2} for you, but right now you're at {:.2}.",
                        record.entity_name, record.avg_mood, current_mood
                    ),
                    data: json!({
                        "currentMood": current_mood,
                        "historicalAvg": record.avg_mood,
                        "gap": gap,
                    }),
                });
            }
        }
    }

    insights.sort_by_key(|i| i.priority);

    tracing::debug!(insights = insights.len(), "proactive context generated");

    insights
}

fn find_sentiment<'a>(
    sentiments: &'a [ActivitySentiment],
    tag: &EntityTag,
) -> Option<&'a ActivitySentiment> {
    let canonical = tag.to_string();
    sentiments.iter().find(|s| s.entity == canonical)
}

// ============================================================================
// TESTS
// ============================================================================
