// src/ingest/feed.rs
//! RSS 2.0 / Atom parsing and the HTTP feed fetcher.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::ingest::types::{FeedEntry, FeedFetcher};
use crate::ingest::MAX_ENTRIES_PER_FEED;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    /// `rel="alternate"` (or no rel) is the article itself.
    fn article_link(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
            .or_else(|| self.links.first())
            .and_then(|l| l.href.clone())
    }
}

/// Feed timestamps come as RFC 2822 (RSS) or RFC 3339 (Atom); anything else
/// is treated as undated.
pub fn parse_feed_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    let parsed = OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .ok()
        .map(|dt| dt.unix_timestamp());
    match parsed {
        Some(secs) => DateTime::from_timestamp(secs, 0),
        // `time` rejects obsolete zone names such as "GMT"/"EST"; chrono accepts them.
        None => DateTime::parse_from_rfc2822(ts)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn looks_like_atom(xml: &str) -> bool {
    !xml.contains("<rss") && xml.contains("<feed")
}

/// Parse an RSS or Atom document into at most `limit` entries.
pub fn parse_feed(xml: &str, source: &str, limit: usize) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);

    let mut out = if looks_like_atom(&xml_clean) {
        parse_atom(&xml_clean, source)?
    } else {
        parse_rss(&xml_clean, source)?
    };
    out.truncate(limit);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("digest_feed_parse_ms").record(ms);
    Ok(out)
}

fn parse_rss(xml: &str, source: &str) -> Result<Vec<FeedEntry>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .map(|it| FeedEntry {
            title: it.title.unwrap_or_default().trim().to_string(),
            link: it.link.unwrap_or_default().trim().to_string(),
            summary: it.description.unwrap_or_default(),
            published: it.pub_date.as_deref().and_then(parse_feed_date),
            source: source.to_string(),
        })
        .collect())
}

fn parse_atom(xml: &str, source: &str) -> Result<Vec<FeedEntry>> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    Ok(feed
        .entry
        .into_iter()
        .map(|e| {
            let link = e.article_link().unwrap_or_default().trim().to_string();
            let published = e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_feed_date);
            FeedEntry {
                title: e.title.map(|t| t.text).unwrap_or_default().trim().to_string(),
                link,
                summary: e.summary.or(e.content).map(|t| t.text).unwrap_or_default(),
                published,
                source: source.to_string(),
            }
        })
        .collect())
}

/// quick-xml only knows the five XML entities; feeds routinely carry HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Plain HTTP GET + parse, one feed at a time.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    limit: usize,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ai-news-digest/0.1")
            .timeout(timeout)
            .build()
            .context("building feed http client")?;
        Ok(Self {
            client,
            limit: MAX_ENTRIES_PER_FEED,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("feed http get()")?
            .error_for_status()
            .context("feed non-2xx")?
            .text()
            .await
            .context("feed http .text()")?;
        parse_feed(&body, url, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_in_both_formats() {
        let want = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        assert_eq!(parse_feed_date("Sat, 06 Sep 2025 09:00:00 +0000"), Some(want));
        assert_eq!(parse_feed_date("2025-09-06T12:00:00+03:00"), Some(want));
        assert_eq!(parse_feed_date("Sat, 06 Sep 2025 09:00:00 GMT"), Some(want));
        assert_eq!(parse_feed_date("yesterday-ish"), None);
    }

    #[test]
    fn atom_prefers_alternate_link() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>t</title>
  <entry>
    <title type="html">Edge models ship</title>
    <link rel="replies" href="https://blog.test/a#comments"/>
    <link rel="alternate" href="https://blog.test/a"/>
    <updated>2025-09-06T09:00:00Z</updated>
    <summary>Short &amp; sweet</summary>
  </entry>
</feed>"#;
        let out = parse_feed(xml, "atom-src", 30).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Edge models ship");
        assert_eq!(out[0].link, "https://blog.test/a");
        assert_eq!(out[0].summary, "Short & sweet");
        assert!(out[0].published.is_some());
        assert_eq!(out[0].source, "atom-src");
    }

    #[test]
    fn rss_respects_limit_and_tolerates_missing_fields() {
        let xml = r#"<rss version="2.0"><channel><title>c</title>
<item><title>One</title><link>https://n.test/1</link></item>
<item><title>Two</title></item>
<item><link>https://n.test/3</link><pubDate>not a date</pubDate></item>
</channel></rss>"#;
        let out = parse_feed(xml, "rss-src", 2).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].title, "Two");
        assert!(out[1].link.is_empty());
        assert!(out[0].published.is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_feed("<html><body>nope</body></html>", "x", 30).is_err());
    }
}
