// src/select/mod.rs
//! Ranking pipeline: dedupe by fingerprint, score, sort, cut.

pub mod fingerprint;
pub mod padding;
pub mod router;
pub mod scoring;

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::ingest::types::FeedEntry;

pub use fingerprint::{canonical_url, fingerprint, normalize_text, Fingerprint};
pub use padding::pad_to;
pub use router::{gaming_pool, is_gaming_relevant, route};
pub use scoring::score;

/// An entry with its score memoized for the current run.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: FeedEntry,
    pub fingerprint: Fingerprint,
    pub score: f64,
}

/// Deduplicated, score-descending view of `pool`.
///
/// Each entry is scored exactly once against `now`. Within a fingerprint group
/// the highest score wins; on a tie the first one seen stays.
pub fn rank(pool: &[FeedEntry], now: DateTime<Utc>) -> Vec<ScoredEntry> {
    let mut best: Vec<ScoredEntry> = Vec::new();
    let mut slot: HashMap<Fingerprint, usize> = HashMap::new();

    for entry in pool.iter().filter(|e| e.is_selectable()) {
        let fp = entry.fingerprint();
        let s = score(entry, now);
        match slot.get(&fp) {
            Some(&i) => {
                tracing::debug!(fingerprint = %fp, link = %entry.link, "duplicate story");
                if s > best[i].score {
                    best[i] = ScoredEntry {
                        entry: entry.clone(),
                        fingerprint: fp,
                        score: s,
                    };
                }
            }
            None => {
                slot.insert(fp.clone(), best.len());
                best.push(ScoredEntry {
                    entry: entry.clone(),
                    fingerprint: fp,
                    score: s,
                });
            }
        }
    }

    // Stable: equal scores keep first-seen order.
    best.sort_by(|a, b| b.score.total_cmp(&a.score));
    best
}

/// Top `k` distinct stories of `pool`, best first.
pub fn select_top(pool: &[FeedEntry], k: usize, now: DateTime<Utc>) -> Vec<FeedEntry> {
    select_top_excluding(pool, k, now, &[])
}

/// Like `select_top`, but stories already in `exclude` never take a slot.
pub fn select_top_excluding(
    pool: &[FeedEntry],
    k: usize,
    now: DateTime<Utc>,
    exclude: &[FeedEntry],
) -> Vec<FeedEntry> {
    let taken: HashSet<Fingerprint> = exclude.iter().map(FeedEntry::fingerprint).collect();
    rank(pool, now)
        .into_iter()
        .filter(|s| !taken.contains(&s.fingerprint))
        .take(k)
        .map(|s| s.entry)
        .collect()
}

/// Every distinct story of `pool`, best first. Used as a padding source.
pub fn rank_all(pool: &[FeedEntry], now: DateTime<Utc>) -> Vec<FeedEntry> {
    select_top(pool, usize::MAX, now)
}
