//! Longitudinal Pattern Analyzers
//!
//! Pure, deterministic aggregations over a user's journal entries:
//! per-entity mood effects, day-of-week and time-of-day structure,
//! mood-swing precursors, short-window trajectories, and the proactive
//! insight composition layered on top of them all.

pub mod activity;
pub mod proactive;
pub mod temporal;
pub mod trajectory;
pub mod triggers;

pub use activity::{ActivitySentiment, Sentiment, activity_sentiment};
pub use proactive::{
    CurrentContext, InsightKind, InsightPriority, ProactiveInsight, proactive_context,
};
pub use temporal::{DayBucket, TemporalPatterns, TimeBucket, TimeOfDay, temporal_patterns};
pub use trajectory::{
    CyclicalPattern, DayDeviation, MoodTrajectory, Trend, cyclical_patterns, mood_trajectory,
};
pub use triggers::{MoodTrigger, MoodTriggers, mood_triggers};
