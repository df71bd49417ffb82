//! End-to-end pattern mining: a realistic journal in, typed insights out

use chrono::{Duration, Weekday};
use tessera_core::prelude::*;
use tessera_core::{InsightKind, InsightPriority, PatternKind, Sentiment, Trend};
use tessera_e2e::fixtures::{anchor, monday_slump, reflection, task};

/// Six weeks of journaling: yoga lifts, the boss drags, Mondays slump.
fn rich_journal() -> Vec<Entry> {
    let mut entries = Vec::new();
    for week in 0..6i64 {
        let base = week * 7;
        // Monday: tough start, boss meeting
        entries.push(reflection(base, &["@person:boss"], 0.25));
        // Tuesday: neutral
        entries.push(reflection(base + 1, &[], 0.5));
        // Wednesday: yoga day
        entries.push(reflection(base + 2, &["@activity:yoga"], 0.85));
        // Thursday: neutral with a task sprinkled in
        entries.push(reflection(base + 3, &[], 0.5));
        entries.push(task(base + 3, Some(0.9)));
        // Friday: decent
        entries.push(reflection(base + 4, &[], 0.6));
    }
    entries
}

#[test]
fn activity_sentiment_finds_lifts_and_drags() {
    let config = EngineConfig::default();
    let sentiments = activity_sentiment(&rich_journal(), None, &config.activity);

    let yoga = sentiments
        .iter()
        .find(|s| s.entity == "@activity:yoga")
        .expect("yoga is a recurring subject");
    assert_eq!(yoga.sentiment, Sentiment::Positive);
    assert_eq!(yoga.entry_count, 6);
    assert!(yoga.insight_text.is_some());

    let boss = sentiments
        .iter()
        .find(|s| s.entity == "@person:boss")
        .expect("the boss is a recurring subject");
    assert_eq!(boss.sentiment, Sentiment::Negative);
    assert!(boss.mood_delta < -0.1);
}

#[test]
fn temporal_patterns_flag_the_monday_slump() {
    let config = EngineConfig::default();
    let patterns = temporal_patterns(&rich_journal(), None, &config);

    let worst = patterns.worst_day.expect("mondays average 0.25");
    assert_eq!(worst.day, Weekday::Mon);
    assert!(worst.avg_mood < 0.45);

    let best = patterns.best_day.expect("wednesdays average 0.85");
    assert_eq!(best.day, Weekday::Wed);
}

#[test]
fn triggers_catch_the_weekly_swings() {
    let config = EngineConfig::default();
    let triggers = mood_triggers(&rich_journal(), None, &config.triggers);

    // Monday 0.25 -> Tuesday 0.5 is +0.25: the boss precedes boosts of
    // relief; Wednesday 0.85 -> Thursday 0.5 is -0.35: yoga precedes the
    // comedown. Both recur weekly.
    assert!(
        triggers
            .boost_precursors
            .iter()
            .any(|t| t.entity == "@person:boss")
    );
    assert!(
        triggers
            .drop_precursors
            .iter()
            .any(|t| t.entity == "@activity:yoga")
    );
    for t in triggers.drop_precursors.iter().chain(&triggers.boost_precursors) {
        assert!(t.count >= 2);
    }
}

#[test]
fn trajectory_and_cycles_read_recent_history() {
    let config = EngineConfig::default();

    // Newest-first window: a declining week
    let recent: Vec<Entry> = vec![
        reflection(6, &[], 0.3),
        reflection(5, &[], 0.35),
        reflection(4, &[], 0.5),
        reflection(3, &[], 0.7),
    ];
    let trajectory = mood_trajectory(&recent, &config.trajectory).expect("four samples");
    assert_eq!(trajectory.trend, Trend::Declining);
    assert_eq!(trajectory.low_streak, 2);

    let cycles = cyclical_patterns(&monday_slump(), None, &config).expect("monday deviates");
    let low = cycles.low_day.expect("monday flagged low");
    assert_eq!(low.day, Weekday::Mon);
    assert!((low.avg_mood - 0.2).abs() < 1e-9);
}

#[test]
fn proactive_context_composes_and_orders_insights() {
    let config = EngineConfig::default();
    let entries = rich_journal();
    let entities = vec![EntityTag::parse("@activity:yoga").unwrap()];
    let context = CurrentContext {
        mood: Some(0.3),
        entities: &entities,
    };
    // A Monday morning, right in the slump
    let now = anchor() + Duration::days(42);

    let insights = proactive_context(&entries, None, &context, &config, now);
    assert!(!insights.is_empty());

    // Support for the hard day comes first
    assert_eq!(insights[0].priority, InsightPriority::Support);
    assert_eq!(insights[0].kind, InsightKind::DayOfWeek);
    // The low mood pulls in the yoga suggestion
    assert!(insights.iter().any(|i| i.kind == InsightKind::MoodSuggestion));
    // Mentioning yoga while at 0.3 contradicts its 0.85 history
    assert!(insights.iter().any(|i| i.kind == InsightKind::Contradiction));
    // Ordering is monotone in priority
    for pair in insights.windows(2) {
        assert!(pair[0].priority <= pair[1].priority);
    }
}

#[test]
fn cache_manager_walks_all_three_states() {
    let config = EngineConfig::default();
    let entries = rich_journal();
    let manager = PatternCacheManager::new(MemoryCacheStore::new(), config);
    let now = anchor() + Duration::days(42);

    // No cache, plenty of entries: computed
    let report = manager.get_all_patterns("user-1", &entries, None, now);
    assert_eq!(report.source, PatternSource::Computed);
    assert!(report.contradictions.is_empty());
    assert!(!report.summary.insights.is_empty());

    // Identical call: still deterministic
    let again = manager.get_all_patterns("user-1", &entries, None, now);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::to_value(&again).unwrap()
    );

    // Three entries: insufficient
    let small: Vec<Entry> = entries.iter().take(3).cloned().collect();
    let report = manager.get_all_patterns("user-1", &small, None, now);
    assert_eq!(report.source, PatternSource::Insufficient);
    assert!(report.activity_sentiment.is_empty());
}

#[test]
fn cache_manager_serves_a_seeded_fresh_cache() {
    use tessera_core::{CacheDocument, CacheKey, CacheStore, PatternSummary, TemporalPatterns};

    let config = EngineConfig::default();
    let entries = rich_journal();
    let newest = entries
        .iter()
        .map(|e| e.timestamp())
        .max()
        .unwrap();
    let updated_at = newest + Duration::hours(1);
    let now = updated_at + Duration::hours(2);

    let store = MemoryCacheStore::new();
    let empty_sentiments: Vec<ActivitySentiment> = Vec::new();
    let empty_contradictions: Vec<tessera_core::Contradiction> = Vec::new();
    let docs = [
        (
            PatternKind::Summary,
            serde_json::to_value(PatternSummary::default()).unwrap(),
        ),
        (
            PatternKind::ActivitySentiment,
            serde_json::to_value(&empty_sentiments).unwrap(),
        ),
        (
            PatternKind::Temporal,
            serde_json::to_value(TemporalPatterns::default()).unwrap(),
        ),
        (
            PatternKind::Contradictions,
            serde_json::to_value(&empty_contradictions).unwrap(),
        ),
    ];
    for (kind, data) in docs {
        store
            .write(
                CacheKey::longitudinal("user-1", kind),
                CacheDocument {
                    data,
                    updated_at,
                    version: tessera_core::CACHE_SCHEMA_VERSION,
                    entry_count: entries.len(),
                },
            )
            .unwrap();
    }

    let manager = PatternCacheManager::new(store, config);
    let report = manager.get_all_patterns("user-1", &entries, None, now);
    assert_eq!(report.source, PatternSource::Cache);
}
