// src/pipeline.rs
//! One digest run: fetch -> route -> rank -> pad -> format -> assemble -> deliver.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{FeedSources, Settings};
use crate::digest::{assemble, assemble_section, ItemFormatter, SectionHeaders};
use crate::enrich::{DynShortener, DynSummarizer};
use crate::ingest::fetch_all;
use crate::ingest::types::{FeedEntry, FeedFetcher};
use crate::notify::Notifier;
use crate::select::{gaming_pool, pad_to, rank_all, route, select_top, select_top_excluding};

/// The four external capabilities a run needs.
pub struct Capabilities {
    pub fetcher: Arc<dyn FeedFetcher>,
    pub summarizer: DynSummarizer,
    pub shortener: DynShortener,
    pub notifier: Arc<dyn Notifier>,
}

/// Final, ordered picks for both sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub gaming: Vec<FeedEntry>,
    pub general: Vec<FeedEntry>,
}

/// Route, rank and pad both sections against one pinned `now`.
///
/// Padding is ordered so no story shows up in both sections: the gaming
/// section borrows from general stories that did not make the general top-k,
/// and the general section borrows from gaming stories not already shown.
pub fn build_sections(
    general_items: Vec<FeedEntry>,
    mobile_items: Vec<FeedEntry>,
    k: usize,
    now: DateTime<Utc>,
) -> Sections {
    let (siphoned, remaining_general) = route(general_items);
    let siphoned_count = siphoned.len();
    let gaming_candidates = gaming_pool(mobile_items, siphoned);

    let gaming_top = select_top(&gaming_candidates, k, now);
    // A story carried by both a gaming feed and a general feed stays in gaming.
    let general_top = select_top_excluding(&remaining_general, k, now, &gaming_top);

    let gaming = pad_to(
        gaming_top,
        k,
        &rank_all(&remaining_general, now),
        &general_top,
    );
    let general = pad_to(
        general_top,
        k,
        &rank_all(&gaming_candidates, now),
        &gaming,
    );

    info!(
        siphoned = siphoned_count,
        gaming_pool = gaming_candidates.len(),
        general_pool = remaining_general.len(),
        gaming = gaming.len(),
        general = general.len(),
        "sections selected"
    );
    Sections { gaming, general }
}

/// Format both sections and lay them out as one or two messages.
pub async fn render_messages(
    formatter: &ItemFormatter,
    sections: &Sections,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<String> {
    let gaming_blocks = formatter.format_all(&sections.gaming).await;
    let general_blocks = formatter.format_all(&sections.general).await;

    let local_now = now.with_timezone(&settings.tz_offset());
    let headers = SectionHeaders::dated(local_now, gaming_blocks.len(), general_blocks.len());

    if settings.split_messages {
        vec![
            assemble_section(&headers.gaming, &gaming_blocks),
            assemble_section(&headers.general, &general_blocks),
        ]
    } else {
        vec![assemble(&gaming_blocks, &general_blocks, &headers)]
    }
}

/// Full run. Only delivery errors propagate.
pub async fn run_once(sources: &FeedSources, settings: &Settings, caps: &Capabilities) -> Result<()> {
    let now = Utc::now();

    let general_items = fetch_all(caps.fetcher.as_ref(), sources.general_ai()).await;
    let mobile_items = fetch_all(caps.fetcher.as_ref(), sources.mobile_gaming()).await;
    info!(
        general = general_items.len(),
        mobile = mobile_items.len(),
        "feeds fetched"
    );

    let sections = build_sections(general_items, mobile_items, settings.top_k, now);

    let formatter = ItemFormatter::new(caps.summarizer.clone(), caps.shortener.clone());
    let messages = render_messages(&formatter, &sections, settings, now).await;

    for (i, msg) in messages.iter().enumerate() {
        caps.notifier
            .send(msg)
            .await
            .with_context(|| format!("delivering message {} of {}", i + 1, messages.len()))?;
    }
    info!(messages = messages.len(), "digest delivered");
    Ok(())
}
