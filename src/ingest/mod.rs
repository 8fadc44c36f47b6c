// src/ingest/mod.rs
pub mod feed;
pub mod types;

use crate::ingest::types::{FeedEntry, FeedFetcher};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// Per-feed ingestion cap.
pub const MAX_ENTRIES_PER_FEED: usize = 30;

/// Upper bound on text handed to the summarizer.
const SOURCE_TEXT_CAP: usize = 1500;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_entries_fetched_total",
            "Entries parsed from all configured feeds."
        );
        describe_counter!(
            "digest_feed_errors_total",
            "Feed fetch/parse errors (feed skipped)."
        );
    });
}

/// Plain text for display and summarization: entity decode, tag strip,
/// quote folding, whitespace collapse.
pub fn plain_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    out = crate::select::fingerprint::normalize_text(&out);

    // 5) Length cap
    if out.chars().count() > SOURCE_TEXT_CAP {
        out = out.chars().take(SOURCE_TEXT_CAP).collect();
    }

    out
}

/// Fetch every feed in `urls` in order. A failing feed is logged and skipped.
pub async fn fetch_all(fetcher: &dyn FeedFetcher, urls: &[String]) -> Vec<FeedEntry> {
    ensure_metrics_described();

    let mut items = Vec::new();
    for url in urls {
        match fetcher.fetch(url).await {
            Ok(mut v) => {
                v.truncate(MAX_ENTRIES_PER_FEED);
                tracing::debug!(feed = %url, entries = v.len(), "feed fetched");
                counter!("digest_entries_fetched_total").increment(v.len() as u64);
                items.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, feed = %url, "feed skipped");
                counter!("digest_feed_errors_total").increment(1);
            }
        }
    }
    items
}
