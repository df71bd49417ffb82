//! Pattern Cache Manager
//!
//! Reads precomputed pattern documents with staleness rules and falls
//! back to on-demand computation. This is the engine's only stateful
//! boundary: the backing store is external, writes are last-writer-wins
//! per key, and documents are always fully regenerated - never patched.
//! The manager itself never writes back; a scheduled job owns that.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::entry::{Entry, in_category};
use crate::patterns::{
    ActivitySentiment, Sentiment, TemporalPatterns, activity_sentiment, temporal_patterns,
};

/// Schema version stamped on cache documents; older documents are stale
pub const CACHE_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Cache boundary error. Never escapes `get_all_patterns`; failures
/// degrade to a cache miss.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store failed
    #[error("cache backend error: {0}")]
    Backend(String),
    /// A document failed to serialize or deserialize
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Cache result type
pub type Result<T> = std::result::Result<T, CacheError>;

// ============================================================================
// KEYS & DOCUMENTS
// ============================================================================

/// The longitudinal pattern sub-documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Summary,
    ActivitySentiment,
    Temporal,
    Contradictions,
}

impl PatternKind {
    /// All sub-documents a fresh cache must cover
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Summary,
        PatternKind::ActivitySentiment,
        PatternKind::Temporal,
        PatternKind::Contradictions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Summary => "summary",
            PatternKind::ActivitySentiment => "activity_sentiment",
            PatternKind::Temporal => "temporal",
            PatternKind::Contradictions => "contradictions",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key for a cache document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheKey {
    /// Daily summary scope
    Daily {
        user: String,
        category: String,
        date: NaiveDate,
    },
    /// Longitudinal pattern scope
    Longitudinal { user: String, kind: PatternKind },
}

impl CacheKey {
    /// Key for a daily summary document
    pub fn daily(user: impl Into<String>, category: impl Into<String>, date: NaiveDate) -> Self {
        CacheKey::Daily {
            user: user.into(),
            category: category.into(),
            date,
        }
    }

    /// Key for a longitudinal pattern document
    pub fn longitudinal(user: impl Into<String>, kind: PatternKind) -> Self {
        CacheKey::Longitudinal {
            user: user.into(),
            kind,
        }
    }
}

/// A cached pattern document with its freshness contract
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    /// The serialized sub-document
    pub data: serde_json::Value,
    /// When the document was generated
    pub updated_at: DateTime<Utc>,
    /// Schema version at generation time
    pub version: u32,
    /// Entries in scope when generated
    pub entry_count: usize,
}

impl CacheDocument {
    /// Build a document from a serializable value
    pub fn new<T: Serialize>(
        value: &T,
        updated_at: DateTime<Utc>,
        entry_count: usize,
    ) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            updated_at,
            version: CACHE_SCHEMA_VERSION,
            entry_count,
        })
    }

    /// Whether the document can still be served.
    ///
    /// Valid only if the recorded entry count matches the current scope,
    /// no entry in scope is newer than the document, local midnight has
    /// not passed since generation, and the document is within the age
    /// bound.
    pub fn is_valid(
        &self,
        now: DateTime<Utc>,
        scope_count: usize,
        latest_entry: Option<DateTime<Utc>>,
        config: &EngineConfig,
    ) -> bool {
        if self.version != CACHE_SCHEMA_VERSION {
            return false;
        }
        if self.entry_count != scope_count {
            return false;
        }
        if latest_entry.is_some_and(|ts| ts > self.updated_at) {
            return false;
        }
        let local_now = now.with_timezone(&config.tz_offset).date_naive();
        let local_updated = self.updated_at.with_timezone(&config.tz_offset).date_naive();
        if local_now != local_updated {
            return false;
        }
        now - self.updated_at <= Duration::hours(config.cache.max_age_hours)
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Read/write access to the cache document store.
///
/// The engine only ever reads; `write` exists for the external refresh
/// job and for tests seeding fixtures.
pub trait CacheStore {
    /// Read a document, `None` on miss
    fn read(&self, key: &CacheKey) -> Result<Option<CacheDocument>>;
    /// Write a document, replacing any previous one (last writer wins)
    fn write(&self, key: CacheKey, document: CacheDocument) -> Result<()>;
}

/// In-memory cache store.
///
/// The lock is required: multiple logical calls for the same user can
/// race on a process-local memo.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    documents: Mutex<HashMap<CacheKey, CacheDocument>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, key: &CacheKey) -> Result<Option<CacheDocument>> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| CacheError::Backend(format!("lock poisoned: {e}")))?;
        Ok(documents.get(key).cloned())
    }

    fn write(&self, key: CacheKey, document: CacheDocument) -> Result<()> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|e| CacheError::Backend(format!("lock poisoned: {e}")))?;
        documents.insert(key, document);
        Ok(())
    }
}

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Where a patterns report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSource {
    /// Served from a fresh precomputed document set
    Cache,
    /// Computed on demand; contradictions are never populated here
    Computed,
    /// Too few entries in scope to compute anything
    Insufficient,
}

impl PatternSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternSource::Cache => "cache",
            PatternSource::Computed => "computed",
            PatternSource::Insufficient => "insufficient",
        }
    }
}

impl std::fmt::Display for PatternSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of summary insight a locally built summary can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    TopPositiveActivity,
    TopNegativeActivity,
    BestDay,
    WorstDay,
}

/// One line of a pattern summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInsight {
    pub kind: SummaryKind,
    pub message: String,
}

/// Compact summary of the strongest patterns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    pub insights: Vec<SummaryInsight>,
}

/// A contradiction found by the heavier external full analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contradiction {
    /// The entity whose history contradicts recent moods
    pub entity: String,
    /// Presentable fact string
    pub message: String,
    /// Structured facts behind the message
    pub data: serde_json::Value,
}

/// Everything `get_all_patterns` returns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsReport {
    /// Where the data came from
    pub source: PatternSource,
    /// Per-entity mood effects
    pub activity_sentiment: Vec<ActivitySentiment>,
    /// Day-of-week / time-of-day structure
    pub temporal: TemporalPatterns,
    /// Contradictions from the full analysis; empty unless cached
    pub contradictions: Vec<Contradiction>,
    /// Compact summary of the strongest patterns
    pub summary: PatternSummary,
}

impl PatternsReport {
    fn empty(source: PatternSource) -> Self {
        Self {
            source,
            activity_sentiment: Vec::new(),
            temporal: TemporalPatterns::default(),
            contradictions: Vec::new(),
            summary: PatternSummary::default(),
        }
    }
}

// ============================================================================
// MANAGER
// ============================================================================

/// Cache-or-compute front door for the pattern analyzers
pub struct PatternCacheManager<S: CacheStore> {
    store: S,
    config: EngineConfig,
}

impl<S: CacheStore> PatternCacheManager<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Access the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the longitudinal patterns for a user, preferring a fresh
    /// cached document set over recomputation.
    ///
    /// Exactly three outcomes: every sub-document cached and fresh
    /// (`source = cache`), enough entries to compute on demand
    /// (`source = computed`, contradictions never populated), or too few
    /// entries (`source = insufficient`, empty structures). Store errors
    /// are logged and treated as misses.
    pub fn get_all_patterns(
        &self,
        user: &str,
        entries: &[Entry],
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> PatternsReport {
        let scoped: Vec<&Entry> = in_category(entries, category).collect();
        let scope_count = scoped.len();
        // `modified_at`, not `timestamp`: a backdated entry written after
        // the cache was generated must still invalidate it.
        let latest_entry = scoped.iter().map(|e| e.modified_at()).max();

        if let Some(report) = self.read_fresh(user, now, scope_count, latest_entry) {
            tracing::debug!(user, scope_count, "patterns served from cache");
            return report;
        }

        if scope_count < self.config.cache.min_entries {
            tracing::debug!(user, scope_count, "insufficient entries for patterns");
            return PatternsReport::empty(PatternSource::Insufficient);
        }

        let sentiments = activity_sentiment(entries, category, &self.config.activity);
        let temporal = temporal_patterns(entries, category, &self.config);
        let summary = build_summary(&sentiments, &temporal, self.config.cache.max_summary_insights);

        tracing::debug!(user, scope_count, "patterns computed on demand");
        PatternsReport {
            source: PatternSource::Computed,
            activity_sentiment: sentiments,
            temporal,
            contradictions: Vec::new(),
            summary,
        }
    }

    /// Assemble a report from the cache; `None` unless every
    /// sub-document is present, valid, and well-formed.
    fn read_fresh(
        &self,
        user: &str,
        now: DateTime<Utc>,
        scope_count: usize,
        latest_entry: Option<DateTime<Utc>>,
    ) -> Option<PatternsReport> {
        let mut documents = Vec::with_capacity(PatternKind::ALL.len());
        for kind in PatternKind::ALL {
            let key = CacheKey::longitudinal(user, kind);
            let document = match self.store.read(&key) {
                Ok(doc) => doc?,
                Err(error) => {
                    tracing::warn!(user, %kind, %error, "cache read failed, treating as miss");
                    return None;
                }
            };
            if !document.is_valid(now, scope_count, latest_entry, &self.config) {
                return None;
            }
            documents.push(document);
        }

        let [summary, sentiments, temporal, contradictions]: [CacheDocument; 4] =
            documents.try_into().ok()?;

        match (
            serde_json::from_value(summary.data),
            serde_json::from_value(sentiments.data),
            serde_json::from_value(temporal.data),
            serde_json::from_value(contradictions.data),
        ) {
            (Ok(summary), Ok(activity_sentiment), Ok(temporal), Ok(contradictions)) => {
                Some(PatternsReport {
                    source: PatternSource::Cache,
                    activity_sentiment,
                    temporal,
                    contradictions,
                    summary,
                })
            }
            _ => {
                tracing::warn!(user, "malformed cache document set, treating as miss");
                None
            }
        }
    }

    /// Read a precomputed daily summary; never computes.
    ///
    /// The same staleness rules as the longitudinal documents apply:
    /// a summary generated for a different scope size, before the newest
    /// change in scope, or past local midnight is treated as absent.
    pub fn daily_summary(
        &self,
        user: &str,
        entries: &[Entry],
        category: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Option<PatternSummary> {
        let scoped: Vec<&Entry> = in_category(entries, Some(category)).collect();
        let latest_entry = scoped.iter().map(|e| e.modified_at()).max();

        let key = CacheKey::daily(user, category, date);
        match self.store.read(&key) {
            Ok(Some(document)) => {
                if !document.is_valid(now, scoped.len(), latest_entry, &self.config) {
                    return None;
                }
                match serde_json::from_value(document.data) {
                    Ok(summary) => Some(summary),
                    Err(error) => {
                        tracing::warn!(user, %error, "malformed daily summary document");
                        None
                    }
                }
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(user, %error, "daily summary read failed");
                None
            }
        }
    }
}

/// Build the locally computed summary: top positive activity, top
/// negative activity, best day, worst day - whichever exist, capped.
fn build_summary(
    sentiments: &[ActivitySentiment],
    temporal: &TemporalPatterns,
    cap: usize,
) -> PatternSummary {
    let mut insights = Vec::new();

    if let Some(top) = sentiments.iter().find(|s| s.sentiment == Sentiment::Positive) {
        insights.push(SummaryInsight {
            kind: SummaryKind::TopPositiveActivity,
            message: format!(
                "{} lifts your mood most ({:+.2} vs your baseline).",
                top.entity_name, top.mood_delta
            ),
        });
    }
    if let Some(top) = sentiments.iter().find(|s| s.sentiment == Sentiment::Negative) {
        insights.push(SummaryInsight {
            kind: SummaryKind::TopNegativeActivity,
            message: format!(
                "{} weighs on your mood most ({:+.2} vs your baseline).",
                top.entity_name, top.mood_delta
            ),
        });
    }
    if let Some(best) = &temporal.best_day {
        insights.push(SummaryInsight {
            kind: SummaryKind::BestDay,
            message: format!("{:?}s tend to be your best day (avg {:.2}).", best.day, best.avg_mood),
        });
    }
    if let Some(worst) = &temporal.worst_day {
        insights.push(SummaryInsight {
            kind: SummaryKind::WorstDay,
            message: format!(
                "{:?}s tend to be your hardest day (avg {:.2}).",
                worst.day, worst.avg_mood
            ),
        });
    }

    insights.truncate(cap);
    PatternSummary { insights }
}

// ============================================================================
// TESTS
// ============================================================================
