//! Temporal Pattern Analyzer
//!
//! Buckets mood-bearing entries by day-of-week and by a fixed
//! time-of-day partition, in the user's local time. Day buckets feed the
//! best/worst-day insights; time-of-day buckets are display-only.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TemporalConfig};
use crate::entry::{Entry, mood_bearing};

// ============================================================================
// TYPES
// ============================================================================

/// Fixed time-of-day partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// [0, 6)
    Night,
    /// [6, 12)
    Morning,
    /// [12, 17)
    Afternoon,
    /// [17, 24)
    Evening,
}

impl TimeOfDay {
    /// Bucket a local hour
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    /// All buckets in display order
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Night,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "night",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate mood for one day-of-week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// The day
    pub day: Weekday,
    /// Mood-bearing samples in the bucket
    pub count: usize,
    /// Mean mood
    pub avg_mood: f64,
}

/// Aggregate mood for one time-of-day band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// The band
    pub time_of_day: TimeOfDay,
    /// Mood-bearing samples in the band
    pub count: usize,
    /// Mean mood
    pub avg_mood: f64,
}

/// Day-of-week and time-of-day mood aggregation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalPatterns {
    /// Day buckets with enough samples, Monday..Sunday order
    pub day_of_week: Vec<DayBucket>,
    /// Time-of-day buckets with enough samples, night..evening order
    pub time_of_day: Vec<TimeBucket>,
    /// Highest-average day, only when clearly good
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_day: Option<DayBucket>,
    /// Lowest-average day, only when clearly bad
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_day: Option<DayBucket>,
}

// ============================================================================
// ANALYZER
// ============================================================================

/// Local hour and weekday of an entry under the engine's timezone offset
fn local_parts(entry: &Entry, config: &EngineConfig) -> (Weekday, u32) {
    let local: DateTime<chrono::FixedOffset> = entry.timestamp().with_timezone(&config.tz_offset);
    (local.weekday(), local.hour())
}

/// Bucket mood-bearing entries by local day-of-week and time-of-day.
///
/// A bucket is reported only when it holds at least
/// `config.temporal.min_samples` samples. The worst day is surfaced only
/// when its average falls below `worst_day_max`, the best only above
/// `best_day_min`; time-of-day buckets never trigger either.
pub fn temporal_patterns(
    entries: &[Entry],
    category: Option<&str>,
    config: &EngineConfig,
) -> TemporalPatterns {
    let thresholds: &TemporalConfig = &config.temporal;

    let mut day_sums = [(0usize, 0.0f64); 7];
    let mut time_sums = [(0usize, 0.0f64); 4];

    for entry in mood_bearing(entries, category) {
        let Some(mood) = entry.mood_score else { continue };
        let (weekday, hour) = local_parts(entry, config);

        let d = weekday.num_days_from_monday() as usize;
        day_sums[d].0 += 1;
        day_sums[d].1 += mood;

        let t = TimeOfDay::ALL
            .iter()
            .position(|b| *b == TimeOfDay::from_hour(hour))
            .unwrap_or(0);
        time_sums[t].0 += 1;
        time_sums[t].1 += mood;
    }

    let day_of_week: Vec<DayBucket> = (0..7)
        .filter(|&d| day_sums[d].0 >= thresholds.min_samples)
        .map(|d| DayBucket {
            day: weekday_from_index(d),
            count: day_sums[d].0,
            avg_mood: day_sums[d].1 / day_sums[d].0 as f64,
        })
        .collect();

    let time_of_day: Vec<TimeBucket> = (0..4)
        .filter(|&t| time_sums[t].0 >= thresholds.min_samples)
        .map(|t| TimeBucket {
            time_of_day: TimeOfDay::ALL[t],
            count: time_sums[t].0,
            avg_mood: time_sums[t].1 / time_sums[t].0 as f64,
        })
        .collect();

    let best_day = day_of_week
        .iter()
        .max_by(|a, b| {
            a.avg_mood
                .partial_cmp(&b.avg_mood)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|d| d.avg_mood > thresholds.best_day_min)
        .cloned();

    let worst_day = day_of_week
        .iter()
        .min_by(|a, b| {
            a.avg_mood
                .partial_cmp(&b.avg_mood)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|d| d.avg_mood < thresholds.worst_day_max)
        .cloned();

    TemporalPatterns {
        day_of_week,
        time_of_day,
        best_day,
        worst_day,
    }
}

fn weekday_from_index(d: usize) -> Weekday {
    match d {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

// ============================================================================
// TESTS
// ============================================================================
