//! Engine Configuration
//!
//! Every threshold the analyzers use lives here and is passed in
//! explicitly. Defaults reproduce the engine's shipped tuning; tests can
//! construct alternates without touching globals.

use chrono::{FixedOffset, Offset, Utc};

// ============================================================================
// RETRIEVAL
// ============================================================================

/// Weights for the hybrid retrieval score components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalWeights {
    /// Weight for embedding cosine similarity
    pub vector: f64,
    /// Weight for recency decay
    pub recency: f64,
    /// Weight for entity overlap
    pub entity: f64,
    /// Weight for mood similarity
    pub mood: f64,
}

impl Default for RetrievalWeights {
    fn default() -> Self {
        Self {
            vector: 0.4,
            recency: 0.3,
            entity: 0.2,
            mood: 0.1,
        }
    }
}

/// Configuration for the hybrid retrieval scorer
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Component weights; conventionally sum to 1.0
    pub weights: RetrievalWeights,
    /// Number of ranked entries to return
    pub top_k: usize,
    /// Candidates at or below this combined score are discarded
    pub min_combined_score: f64,
    /// Days after which the recency score halves
    pub recency_half_life_days: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            weights: RetrievalWeights::default(),
            top_k: 10,
            min_combined_score: 0.1,
            recency_half_life_days: 7.0,
        }
    }
}

// ============================================================================
// ANALYZERS
// ============================================================================

/// Thresholds for the activity sentiment analyzer
#[derive(Debug, Clone)]
pub struct ActivityConfig {
    /// Minimum mood-bearing entries a tag needs to be reported
    pub min_entries: usize,
    /// |mood_delta| beyond which sentiment is non-neutral
    pub sentiment_delta: f64,
    /// |mood_delta_percent| beyond which an insight text is generated
    pub insight_delta_percent: f64,
    /// Entry count that triggers a frequency-only insight
    pub frequency_floor: usize,
    /// Entry ids kept as supporting evidence per record
    pub max_recent_entries: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            min_entries: 2,
            sentiment_delta: 0.1,
            insight_delta_percent: 10.0,
            frequency_floor: 5,
            max_recent_entries: 3,
        }
    }
}

/// Thresholds for the temporal pattern analyzer
#[derive(Debug, Clone)]
pub struct TemporalConfig {
    /// Minimum samples for a bucket to be reported
    pub min_samples: usize,
    /// Worst day is reported only below this average
    pub worst_day_max: f64,
    /// Best day is reported only above this average
    pub best_day_min: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            min_samples: 2,
            worst_day_max: 0.45,
            best_day_min: 0.6,
        }
    }
}

/// Thresholds for the mood trigger detector
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// |delta| between consecutive moods that counts as a swing
    pub swing: f64,
    /// Minimum occurrences for a precursor to be kept
    pub min_count: usize,
    /// Precursors returned per direction
    pub top_n: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            swing: 0.2,
            min_count: 2,
            top_n: 5,
        }
    }
}

/// Thresholds for mood trajectory and cyclical pattern utilities
#[derive(Debug, Clone)]
pub struct TrajectoryConfig {
    /// Most recent mood-bearing entries considered
    pub window: usize,
    /// |trend| beyond which the trajectory is not stable
    pub trend_epsilon: f64,
    /// Mood below this counts toward a low streak
    pub low_mood: f64,
    /// Mood above this counts toward a high streak
    pub high_mood: f64,
    /// Streaks shorter than this are reported as zero
    pub min_streak: usize,
    /// Mood-bearing entries required for cyclical analysis
    pub cyclical_min_entries: usize,
    /// Samples required per day-of-week to count
    pub cyclical_min_samples: usize,
    /// Deviation from the overall average that flags a day
    pub cyclical_deviation: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            window: 7,
            trend_epsilon: 0.1,
            low_mood: 0.4,
            high_mood: 0.6,
            min_streak: 2,
            cyclical_min_entries: 14,
            cyclical_min_samples: 2,
            cyclical_deviation: 0.15,
        }
    }
}

/// Thresholds for the proactive context generator
#[derive(Debug, Clone)]
pub struct ProactiveConfig {
    /// Current mood below this triggers positive-activity suggestions
    pub suggestion_mood: f64,
    /// Minimum mood_delta_percent for a suggested activity
    pub suggestion_delta_percent: f64,
    /// Suggestions emitted at most
    pub max_suggestions: usize,
    /// |current_mood - historical avg| that flags a contradiction
    pub contradiction_gap: f64,
    /// Entry count a tag needs before contradictions are considered
    pub contradiction_min_entries: usize,
}

impl Default for ProactiveConfig {
    fn default() -> Self {
        Self {
            suggestion_mood: 0.4,
            suggestion_delta_percent: 15.0,
            max_suggestions: 2,
            contradiction_gap: 0.25,
            contradiction_min_entries: 3,
        }
    }
}

/// Thresholds for the pattern cache manager
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cached sub-documents older than this are stale
    pub max_age_hours: i64,
    /// Entries required for on-demand computation
    pub min_entries: usize,
    /// Insights kept in a locally built summary
    pub max_summary_insights: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_hours: 6,
            min_entries: 5,
            max_summary_insights: 5,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Aggregate configuration for the whole engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub retrieval: RetrievalConfig,
    pub activity: ActivityConfig,
    pub temporal: TemporalConfig,
    pub triggers: TriggerConfig,
    pub trajectory: TrajectoryConfig,
    pub proactive: ProactiveConfig,
    pub cache: CacheConfig,
    /// Offset applied before local-hour and local-day bucketing
    pub tz_offset: FixedOffset,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            activity: ActivityConfig::default(),
            temporal: TemporalConfig::default(),
            triggers: TriggerConfig::default(),
            trajectory: TrajectoryConfig::default(),
            proactive: ProactiveConfig::default(),
            cache: CacheConfig::default(),
            tz_offset: Utc.fix(),
        }
    }
}

impl EngineConfig {
    /// Configuration with an explicit local timezone offset
    pub fn with_tz_offset(tz_offset: FixedOffset) -> Self {
        Self {
            tz_offset,
            ..Self::default()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
