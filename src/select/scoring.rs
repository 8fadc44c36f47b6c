// src/select/scoring.rs
//! Recency/quality heuristic.
//!
//! score = 10 / recency_hours + title_bonus + min(1.5, summary_chars / 400)
//!
//! `recency_hours` is floored at 1, so anything newer than an hour (or dated
//! in the future) gets the full 10 points. Undated entries are pinned at
//! `UNDATED_RECENCY_HOURS`, which makes their recency term ~0.001.
//! The score depends on `now`: callers pin one `now` per run.

use chrono::{DateTime, Utc};

use crate::ingest::types::FeedEntry;

pub const RECENCY_WEIGHT: f64 = 10.0;
pub const UNDATED_RECENCY_HOURS: f64 = 9999.0;
pub const TITLE_BONUS: f64 = 1.0;
pub const SUMMARY_CHARS_PER_POINT: f64 = 400.0;
pub const SUMMARY_BONUS_CAP: f64 = 1.5;

pub fn recency_hours(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match published {
        Some(ts) => {
            let secs = now.signed_duration_since(ts).num_milliseconds() as f64 / 1_000.0;
            (secs / 3_600.0).max(1.0)
        }
        None => UNDATED_RECENCY_HOURS,
    }
}

pub fn score(entry: &FeedEntry, now: DateTime<Utc>) -> f64 {
    let recency = RECENCY_WEIGHT / recency_hours(entry.published, now);
    let title = if entry.title.is_empty() { 0.0 } else { TITLE_BONUS };
    let summary_chars = entry.summary.chars().count() as f64;
    let summary = (summary_chars / SUMMARY_CHARS_PER_POINT).min(SUMMARY_BONUS_CAP);
    recency + title + summary
}
