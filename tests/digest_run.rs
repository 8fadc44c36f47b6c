// tests/digest_run.rs
use ai_news_digest::config::{FeedSources, Settings};
use ai_news_digest::digest::ItemFormatter;
use ai_news_digest::enrich::{
    CanonicalOnly, ChainShortener, DisabledSummarizer, ShortenProvider, FALLBACK_ACTION,
};
use ai_news_digest::notify::Notifier;
use ai_news_digest::select::{pad_to, route, select_top};
use ai_news_digest::{build_sections, run_once, Capabilities, FeedEntry, FeedFetcher};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 6, 12, 0, 0).unwrap()
}

fn entry(title: &str, slug: &str, age_hours: i64, now: DateTime<Utc>) -> FeedEntry {
    FeedEntry::new(title, format!("https://news.test/{slug}"))
        .with_summary(format!("{title}. Details follow."))
        .published_at(now - Duration::hours(age_hours))
}

/// Serves canned entries per URL; unknown URLs fail like a dead feed.
struct FakeFetcher {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

#[async_trait]
impl FeedFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {url}"))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct RejectingNotifier;

#[async_trait]
impl Notifier for RejectingNotifier {
    async fn send(&self, _text: &str) -> Result<()> {
        Err(anyhow!("chat not found"))
    }
}

fn sources() -> FeedSources {
    FeedSources::from_categories([
        (
            "general_ai",
            vec!["https://general.test/rss", "https://dead.test/rss"],
        ),
        ("mobile_gaming", vec!["https://mobile.test/atom"]),
    ])
}

fn fetcher(now: DateTime<Utc>) -> FakeFetcher {
    let general = vec![
        entry("Open-weight model tops leaderboard", "model", 1, now),
        entry("Android game studio raises $10M", "android", 2, now),
        entry("EU AI Act guidance published", "eu", 3, now),
        entry("Chip startup unveils inference card", "chip", 4, now),
        entry("Robotics lab open-sources dataset", "robotics", 5, now),
    ];
    let mobile = vec![entry("Gacha publisher tests AI quests", "gacha", 1, now)];
    FakeFetcher {
        feeds: HashMap::from([
            ("https://general.test/rss".to_string(), general),
            ("https://mobile.test/atom".to_string(), mobile),
        ]),
    }
}

fn caps(fetcher: FakeFetcher, notifier: Arc<dyn Notifier>) -> Capabilities {
    Capabilities {
        fetcher: Arc::new(fetcher),
        summarizer: Arc::new(DisabledSummarizer),
        shortener: Arc::new(CanonicalOnly),
        notifier,
    }
}

#[test]
fn top_three_of_five_highest_first() {
    let now = fixed_now();
    let pool: Vec<_> = [5, 1, 4, 2, 3]
        .iter()
        .map(|h| entry(&format!("Story {h}"), &format!("s{h}"), *h, now))
        .collect();
    let top = select_top(&pool, 3, now);
    let links: Vec<_> = top.iter().map(|e| e.link.as_str()).collect();
    assert_eq!(
        links,
        ["https://news.test/s1", "https://news.test/s2", "https://news.test/s3"]
    );
}

#[test]
fn android_title_is_routed_to_gaming() {
    let e = FeedEntry::new("Android game studio raises $10M", "https://news.test/a");
    let (gaming, rest) = route(vec![e.clone()]);
    assert_eq!(gaming, vec![e]);
    assert!(rest.is_empty());
}

#[test]
fn padding_appends_fallback_in_its_own_order() {
    let now = fixed_now();
    let one = vec![entry("Roblox AI textures", "roblox", 1, now)];
    let fallback: Vec<_> = (0..5)
        .map(|i| entry(&format!("Fallback {i}"), &format!("f{i}"), 10 - i, now))
        .collect();
    let padded = pad_to(one.clone(), 3, &fallback, &[]);
    assert_eq!(padded.len(), 3);
    assert_eq!(padded[0], one[0]);
    assert_eq!(padded[1].link, "https://news.test/f0");
    assert_eq!(padded[2].link, "https://news.test/f1");
}

#[test]
fn sections_never_share_a_story() {
    let now = fixed_now();
    let f = fetcher(now);
    let general = f.feeds["https://general.test/rss"].clone();
    let mobile = f.feeds["https://mobile.test/atom"].clone();

    let s = build_sections(general, mobile, 3, now);
    assert_eq!(s.gaming.len(), 3);
    assert_eq!(s.general.len(), 3);
    // dedicated + siphoned gaming stories, newest first
    assert_eq!(s.gaming[0].link, "https://news.test/gacha");
    assert_eq!(s.gaming[1].link, "https://news.test/android");
    for g in &s.gaming {
        assert!(s.general.iter().all(|n| n.link != g.link), "{} twice", g.link);
    }
}

#[tokio::test]
async fn disabled_summarizer_uses_first_28_words() {
    let words: Vec<String> = (1..=40).map(|i| format!("w{i}")).collect();
    let e = FeedEntry::new("Long read", "https://news.test/long").with_summary(words.join("  "));
    let fmt = ItemFormatter::new(Arc::new(DisabledSummarizer), Arc::new(CanonicalOnly));

    let block = fmt.format(&e).await;
    let first = block.lines().next().unwrap();
    assert_eq!(first, format!("• *Long read*: {}", words[..28].join(" ")));
}

#[tokio::test]
async fn unreachable_shorteners_leave_canonical_link() {
    let dead = |name| ShortenProvider {
        name,
        endpoint: "http://127.0.0.1:9/create".to_string(),
    };
    let chain = ChainShortener::new(vec![dead("a"), dead("b")], std::time::Duration::from_secs(1));
    let fmt = ItemFormatter::new(Arc::new(DisabledSummarizer), Arc::new(chain));

    let e = FeedEntry::new("Quiet day", "https://news.test/q?utm_source=rss#top");
    let block = fmt.format(&e).await;
    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(lines[1], "🔗 https://news.test/q");
    assert_eq!(lines[2], format!("👉 {FALLBACK_ACTION}"));
}

#[tokio::test]
async fn run_once_posts_one_combined_digest() {
    let now = Utc::now();
    let notifier = Arc::new(RecordingNotifier::default());
    let caps = caps(fetcher(now), notifier.clone());

    run_once(&sources(), &Settings::default(), &caps)
        .await
        .expect("run ok despite dead feed");

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let msg = &sent[0];
    assert!(msg.starts_with("\n*🎮 AI in Mobile Gaming — Top 3 ("), "{msg}");
    assert!(msg.contains("\n\n\n*🤖 AI in General — Top 3 ("), "{msg}");
    assert_eq!(msg.matches("🔗 ").count(), 6);
    assert_eq!(msg.matches("👉 ").count(), 6);
}

#[tokio::test]
async fn split_mode_posts_each_section_separately() {
    let now = Utc::now();
    let notifier = Arc::new(RecordingNotifier::default());
    let caps = caps(fetcher(now), notifier.clone());
    let settings = Settings {
        split_messages: true,
        ..Settings::default()
    };

    run_once(&sources(), &settings, &caps).await.unwrap();

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("*🎮 AI in Mobile Gaming"));
    assert!(sent[1].starts_with("*🤖 AI in General"));
}

#[tokio::test]
async fn empty_feeds_still_post_headers() {
    let notifier = Arc::new(RecordingNotifier::default());
    let caps = caps(
        FakeFetcher {
            feeds: HashMap::new(),
        },
        notifier.clone(),
    );

    run_once(&sources(), &Settings::default(), &caps).await.unwrap();

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Top 0"));
    assert!(!sent[0].contains("🔗"));
}

#[tokio::test]
async fn delivery_failure_fails_the_run() {
    let caps = caps(fetcher(Utc::now()), Arc::new(RejectingNotifier));
    let err = run_once(&sources(), &Settings::default(), &caps)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("chat not found"), "{err:#}");
}
