//! Mood Trajectory / Cyclical Pattern Utilities
//!
//! Short-window trend and streak summaries, plus day-of-week deviation
//! flags over longer histories. Both feed prompt prioritization; both
//! return `None` rather than an error when the sample floor is unmet.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TrajectoryConfig};
use crate::entry::{Entry, mood_bearing};

// ============================================================================
// TRAJECTORY
// ============================================================================

/// Direction of the short-window mood trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Short-window mood summary over the most recent entries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrajectory {
    /// Mean mood across the window
    pub average: f64,
    /// `newest - oldest` mood within the window
    pub trend_delta: f64,
    /// Classified trend direction
    pub trend: Trend,
    /// Consecutive low-mood entries from the newest backward; zero when
    /// shorter than the minimum streak
    pub low_streak: usize,
    /// Consecutive high-mood entries from the newest backward; zero when
    /// shorter than the minimum streak
    pub high_streak: usize,
    /// Entries that fed the summary
    pub sample_count: usize,
}

/// Summarize the mood trend over the most recent entries.
///
/// `recent_entries` must be ordered newest-first; the caller owns that
/// ordering. Task and moodless entries are ignored. Returns `None` with
/// fewer than two mood-bearing samples in the window.
pub fn mood_trajectory(
    recent_entries: &[Entry],
    config: &TrajectoryConfig,
) -> Option<MoodTrajectory> {
    let moods: Vec<f64> = recent_entries
        .iter()
        .filter(|e| e.is_mood_bearing())
        .filter_map(|e| e.mood_score)
        .take(config.window)
        .collect();

    if moods.len() < 2 {
        return None;
    }

    let average = moods.iter().sum::<f64>() / moods.len() as f64;
    let newest = moods[0];
    let oldest = moods[moods.len() - 1];
    let trend_delta = newest - oldest;
    let trend = if trend_delta > config.trend_epsilon {
        Trend::Improving
    } else if trend_delta < -config.trend_epsilon {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let low_streak = streak(&moods, |m| m < config.low_mood, config.min_streak);
    let high_streak = streak(&moods, |m| m > config.high_mood, config.min_streak);

    Some(MoodTrajectory {
        average,
        trend_delta,
        trend,
        low_streak,
        high_streak,
        sample_count: moods.len(),
    })
}

/// Count consecutive qualifying moods from the front; streaks under the
/// minimum report as zero
fn streak(moods: &[f64], qualifies: impl Fn(f64) -> bool, min_streak: usize) -> usize {
    let run = moods.iter().take_while(|&&m| qualifies(m)).count();
    if run >= min_streak { run } else { 0 }
}

// ============================================================================
// CYCLICAL PATTERNS
// ============================================================================

/// A day-of-week whose average mood deviates notably from the overall
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDeviation {
    /// The flagged day
    pub day: Weekday,
    /// Mean mood on that day
    pub avg_mood: f64,
    /// `avg_mood - overall_avg`
    pub deviation: f64,
    /// Samples on that day
    pub count: usize,
}

/// Day-of-week deviation summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclicalPattern {
    /// Mean mood across all samples
    pub overall_avg: f64,
    /// The single day notably below the overall average, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_day: Option<DayDeviation>,
    /// The single day notably above the overall average, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_day: Option<DayDeviation>,
}

/// Flag days of the week whose mood deviates beyond the configured
/// threshold from the overall average.
///
/// Requires at least `cyclical_min_entries` mood-bearing entries and
/// `cyclical_min_samples` per counted day. Returns `None` when the
/// history is too short or no day qualifies.
pub fn cyclical_patterns(
    entries: &[Entry],
    category: Option<&str>,
    config: &EngineConfig,
) -> Option<CyclicalPattern> {
    let thresholds: &TrajectoryConfig = &config.trajectory;
    let scoped: Vec<&Entry> = mood_bearing(entries, category).collect();
    if scoped.len() < thresholds.cyclical_min_entries {
        return None;
    }

    let mut day_sums = [(0usize, 0.0f64); 7];
    let mut total = 0.0;
    for entry in &scoped {
        let Some(mood) = entry.mood_score else { continue };
        let local = entry.timestamp().with_timezone(&config.tz_offset);
        let d = local.weekday().num_days_from_monday() as usize;
        day_sums[d].0 += 1;
        day_sums[d].1 += mood;
        total += mood;
    }
    let overall_avg = total / scoped.len() as f64;

    let deviations = (0..7).filter_map(|d| {
        let (count, sum) = day_sums[d];
        if count < thresholds.cyclical_min_samples {
            return None;
        }
        let avg_mood = sum / count as f64;
        Some(DayDeviation {
            day: weekday_from_index(d),
            avg_mood,
            deviation: avg_mood - overall_avg,
            count,
        })
    });

    let mut low_day: Option<DayDeviation> = None;
    let mut high_day: Option<DayDeviation> = None;
    for dev in deviations {
        if dev.deviation < -thresholds.cyclical_deviation
            && low_day.as_ref().is_none_or(|d| dev.deviation < d.deviation)
        {
            low_day = Some(dev);
        } else if dev.deviation > thresholds.cyclical_deviation
            && high_day.as_ref().is_none_or(|d| dev.deviation > d.deviation)
        {
            high_day = Some(dev);
        }
    }

    if low_day.is_none() && high_day.is_none() {
        return None;
    }

    Some(CyclicalPattern {
        overall_avg,
        low_day,
        high_day,
    })
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
