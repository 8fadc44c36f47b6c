// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One news item as read from a feed. Read-only for the rest of the run.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String, // raw, may still contain markup
    pub published: Option<DateTime<Utc>>,
    pub source: String, // feed URL the entry came from
}

impl FeedEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn published_at(mut self, ts: DateTime<Utc>) -> Self {
        self.published = Some(ts);
        self
    }
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Entries of one feed in document order.
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>>;
}
