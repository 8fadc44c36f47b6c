//! AI news digest — binary entrypoint.
//! One pass: fetch configured feeds, build both sections, post, exit.
//! Any error that reaches `main` exits non-zero.

use std::sync::Arc;
use std::time::Duration;

use ai_news_digest::config::sources::load_sources_default;
use ai_news_digest::config::Settings;
use ai_news_digest::enrich::{build_summarizer, CanonicalOnly, ChainShortener, DynShortener};
use ai_news_digest::ingest::feed::HttpFeedFetcher;
use ai_news_digest::notify::{Notifier, StdoutNotifier, TelegramNotifier};
use ai_news_digest::{run_once, Capabilities};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const FEED_TIMEOUT: Duration = Duration::from_secs(15);

/// Compact logs to stderr; `RUST_LOG` overrides the default filter.
/// `DIGEST_LOG_JSON=1` switches to JSON lines for log shippers.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ai_news_digest=info,warn"));

    let json = std::env::var("DIGEST_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env()?;
    let sources = load_sources_default()?;
    tracing::info!(
        feeds = sources.total_feeds(),
        split = settings.split_messages,
        dry_run = settings.dry_run,
        "starting digest run"
    );

    let (notifier, shortener): (Arc<dyn Notifier>, DynShortener) = if settings.dry_run {
        (Arc::new(StdoutNotifier), Arc::new(CanonicalOnly))
    } else {
        (
            Arc::new(TelegramNotifier::from_settings(&settings)?),
            Arc::new(ChainShortener::default_chain()),
        )
    };

    let caps = Capabilities {
        fetcher: Arc::new(HttpFeedFetcher::new(FEED_TIMEOUT)?),
        summarizer: build_summarizer(&settings),
        shortener,
        notifier,
    };

    run_once(&sources, &settings, &caps).await
}
