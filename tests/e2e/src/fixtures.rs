//! Synthetic journal builders shared across the e2e suites
//!
//! All fixtures anchor on Monday 2025-06-02 so day-of-week expectations
//! stay readable in the tests.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use tessera_core::{Entry, EntryType};

/// Monday, 2025-06-02 12:00 UTC - the anchor for every fixture
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
}

/// A reflection entry `days` after the anchor
pub fn reflection(days: i64, tags: &[&str], mood: f64) -> Entry {
    Entry::new(
        format!("journal entry on day {days}"),
        "personal",
        EntryType::Reflection,
    )
    .with_tags(tags.iter().map(|t| t.to_string()).collect())
    .with_mood(mood)
    .recorded_at(anchor() + Duration::days(days))
}

/// A task entry; never mood-bearing regardless of the score given
pub fn task(days: i64, mood: Option<f64>) -> Entry {
    let mut entry = Entry::new("errand", "personal", EntryType::Task)
        .recorded_at(anchor() + Duration::days(days));
    entry.mood_score = mood;
    entry
}

/// One entry per day for `weeks` full weeks. `mood_for` maps the weekday
/// to a mood score.
pub fn daily_journal(weeks: usize, mood_for: impl Fn(Weekday) -> f64) -> Vec<Entry> {
    (0..weeks as i64 * 7)
        .map(|day| {
            let at = anchor() + Duration::days(day);
            reflection(day, &[], mood_for(at.weekday()))
        })
        .collect()
}

/// Two weeks of entries where Mondays drag and every other day is fine
pub fn monday_slump() -> Vec<Entry> {
    daily_journal(2, |day| if day == Weekday::Mon { 0.2 } else { 0.7 })
}

/// A deterministic unit-length-ish embedding for tests
pub fn embedding(seed: usize) -> Vec<f32> {
    (0..32).map(|j| ((seed * 32 + j) as f32).sin()).collect()
}
