// src/select/padding.rs
use std::collections::HashSet;

use crate::ingest::types::FeedEntry;
use crate::select::fingerprint::Fingerprint;

/// Top up `selection` to `target` from `fallback`, walked in its own order.
///
/// Skips fallback entries that are unselectable, already selected, already
/// appended in this pass, or present in `exclude` (the other section). No
/// re-sort: appended entries keep fallback order.
pub fn pad_to(
    mut selection: Vec<FeedEntry>,
    target: usize,
    fallback: &[FeedEntry],
    exclude: &[FeedEntry],
) -> Vec<FeedEntry> {
    if selection.len() >= target {
        return selection;
    }

    let mut seen: HashSet<Fingerprint> = selection
        .iter()
        .chain(exclude)
        .map(FeedEntry::fingerprint)
        .collect();

    for candidate in fallback {
        if selection.len() == target {
            break;
        }
        if !candidate.is_selectable() {
            continue;
        }
        if seen.insert(candidate.fingerprint()) {
            selection.push(candidate.clone());
        }
    }

    if selection.len() < target {
        tracing::debug!(
            have = selection.len(),
            target,
            "fallback pool exhausted before target"
        );
    }
    selection
}
