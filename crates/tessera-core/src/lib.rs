//! # Tessera Core
//!
//! Hybrid retrieval and longitudinal pattern engine for a personal
//! journal. Turns an unordered collection of entries into:
//!
//! - **Ranked relevant memories** for a query: a weighted blend of
//!   embedding similarity, recency decay, entity overlap, and mood
//!   similarity, with the per-component breakdown kept for
//!   explainability
//! - **Typed behavioral insights**: activity-mood correlations against a
//!   baseline, day-of-week and time-of-day effects, mood-swing
//!   precursors, short-window trajectories, and proactive prompts
//!   composed from all of the above
//! - **A staleness-aware pattern cache** that serves precomputed
//!   documents while they are fresh and recomputes on demand otherwise
//!
//! Everything outside the cache store is pure and synchronous: no I/O,
//! no hidden clock ("now" is always a parameter), no global tunables
//! (every threshold lives on [`EngineConfig`]). Similarity search is a
//! linear scan - the corpus is one user's journal, not a vector
//! database.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_core::{
//!     Entry, EntryType, EngineConfig, RetrievalQuery, hybrid_retrieve,
//! };
//!
//! let config = EngineConfig::default();
//! let entries = vec![
//!     Entry::new("Long run by the river", "personal", EntryType::Reflection)
//!         .with_tags(vec!["@activity:running".into()])
//!         .with_mood(0.8),
//! ];
//!
//! let entities = vec![tessera_core::EntityTag::parse("@activity:running").unwrap()];
//! let query = RetrievalQuery {
//!     entities: &entities,
//!     mood: Some(0.7),
//!     ..Default::default()
//! };
//! let ranked = hybrid_retrieve(&query, &entries, &config.retrieval, chrono::Utc::now());
//! assert_eq!(ranked.len(), 1);
//! ```
//!
//! ## Boundaries
//!
//! The entry store, embedding generation, natural-language phrasing, and
//! the scheduled cache refresh job are external collaborators. This
//! crate only reads entries, computes, and reads cache documents.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod cache;
pub mod config;
pub mod entry;
pub mod index;
pub mod patterns;
pub mod retrieval;
pub mod scoring;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Data model
pub use entry::{Entry, EntityTag, EntityType, EntryType, in_category, mood_bearing};

// Configuration
pub use config::{
    ActivityConfig, CacheConfig, EngineConfig, ProactiveConfig, RetrievalConfig, RetrievalWeights,
    TemporalConfig, TrajectoryConfig, TriggerConfig,
};

// Scoring primitives
pub use scoring::{
    cosine_similarity, embedding_similarity, entity_match_score, mood_similarity, recency_score,
};

// Entity index
pub use index::{EntityIndexRecord, build_entity_index};

// Hybrid retrieval
pub use retrieval::{RankedEntry, RetrievalQuery, ScoreBreakdown, hybrid_retrieve};

// Pattern analyzers
pub use patterns::{
    ActivitySentiment, CurrentContext, CyclicalPattern, DayBucket, DayDeviation, InsightKind,
    InsightPriority, MoodTrajectory, MoodTrigger, MoodTriggers, ProactiveInsight, Sentiment,
    TemporalPatterns, TimeBucket, TimeOfDay, Trend, activity_sentiment, cyclical_patterns,
    mood_trajectory, mood_triggers, proactive_context, temporal_patterns,
};

// Pattern cache
pub use cache::{
    CACHE_SCHEMA_VERSION, CacheDocument, CacheError, CacheKey, CacheStore, Contradiction,
    MemoryCacheStore, PatternCacheManager, PatternKind, PatternSource, PatternSummary,
    PatternsReport, SummaryInsight, SummaryKind,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ActivitySentiment, CurrentContext, EngineConfig, Entry, EntityTag, EntityType, EntryType,
        MemoryCacheStore, MoodTriggers, PatternCacheManager, PatternSource, PatternsReport,
        ProactiveInsight, RankedEntry, RetrievalQuery, RetrievalWeights, TemporalPatterns,
        activity_sentiment,
        build_entity_index, cyclical_patterns, hybrid_retrieve, mood_trajectory, mood_triggers,
        proactive_context, temporal_patterns,
    };
}
