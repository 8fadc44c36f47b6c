// src/select/router.rs
//! Siphons mobile/gaming stories out of the general pool.

use crate::ingest::types::FeedEntry;

/// Substring match on lower-cased "title summary"; "androidx" counts as android.
pub const GAMING_KEYWORDS: &[&str] = &[
    "mobile",
    "android",
    "ios",
    "app store",
    "google play",
    "unity",
    "roblox",
    "snapdragon",
];

pub fn is_gaming_relevant(entry: &FeedEntry) -> bool {
    let text = format!("{} {}", entry.title, entry.summary).to_lowercase();
    GAMING_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Split `general_pool` into (gaming_subset, remaining_general), both in input order.
pub fn route(general_pool: Vec<FeedEntry>) -> (Vec<FeedEntry>, Vec<FeedEntry>) {
    general_pool.into_iter().partition(is_gaming_relevant)
}

/// Dedicated gaming feeds first, then whatever was siphoned from the general feeds.
pub fn gaming_pool(dedicated: Vec<FeedEntry>, siphoned: Vec<FeedEntry>) -> Vec<FeedEntry> {
    let mut pool = dedicated;
    pool.extend(siphoned);
    pool
}
