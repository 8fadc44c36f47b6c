// src/enrich/shorten.rs
//! Short links for the digest. Always yields something usable: the first
//! provider answer that looks like a URL, else the canonical URL itself.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::select::canonical_url;

#[async_trait]
pub trait Shortener: Send + Sync {
    /// Short URL for `url`, or its canonical form when no provider answers.
    async fn shorten(&self, url: &str) -> String;
}

pub type DynShortener = Arc<dyn Shortener>;

/// A GET endpoint that takes the long URL as `?url=` and answers with plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenProvider {
    pub name: &'static str,
    pub endpoint: String,
}

impl ShortenProvider {
    pub fn is_gd() -> Self {
        Self {
            name: "is.gd",
            endpoint: "https://is.gd/create.php?format=simple".into(),
        }
    }

    pub fn tinyurl() -> Self {
        Self {
            name: "tinyurl",
            endpoint: "https://tinyurl.com/api-create.php".into(),
        }
    }
}

/// Accept only a single http(s) token; shorteners answer errors as plain text too.
pub fn looks_like_url(s: &str) -> bool {
    let s = s.trim();
    (s.starts_with("https://") || s.starts_with("http://"))
        && s.len() > "https://".len()
        && !s.chars().any(char::is_whitespace)
}

/// Tries each provider once, in order. No retries against the same provider.
pub struct ChainShortener {
    http: reqwest::Client,
    providers: Vec<ShortenProvider>,
}

impl ChainShortener {
    pub fn new(providers: Vec<ShortenProvider>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("ai-news-digest/0.1")
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { http, providers }
    }

    /// is.gd, then TinyURL, 8 s each.
    pub fn default_chain() -> Self {
        Self::new(
            vec![ShortenProvider::is_gd(), ShortenProvider::tinyurl()],
            Duration::from_secs(8),
        )
    }

    async fn try_provider(&self, provider: &ShortenProvider, url: &str) -> Option<String> {
        let resp = self
            .http
            .get(&provider.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let body = resp.text().await.ok()?;
        let short = body.trim();
        looks_like_url(short).then(|| short.to_string())
    }
}

#[async_trait]
impl Shortener for ChainShortener {
    async fn shorten(&self, url: &str) -> String {
        let canonical = canonical_url(url);
        if canonical.is_empty() {
            return canonical;
        }
        for provider in &self.providers {
            if let Some(short) = self.try_provider(provider, &canonical).await {
                return short;
            }
            tracing::debug!(provider = provider.name, "shortener unavailable, trying next");
        }
        canonical
    }
}

/// No network: canonical URL only. Used for dry runs.
pub struct CanonicalOnly;

#[async_trait]
impl Shortener for CanonicalOnly {
    async fn shorten(&self, url: &str) -> String {
        canonical_url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_acceptance_rules() {
        assert!(looks_like_url("https://is.gd/abc12"));
        assert!(looks_like_url("  http://tinyurl.com/x \n"));
        assert!(!looks_like_url("Error: Please enter a valid URL to shorten"));
        assert!(!looks_like_url("https://"));
        assert!(!looks_like_url("https://is.gd/a b"));
        assert!(!looks_like_url(""));
    }

    #[tokio::test]
    async fn canonical_only_strips_query() {
        let out = CanonicalOnly.shorten("https://n.test/a?utm_source=rss").await;
        assert_eq!(out, "https://n.test/a");
    }

    #[tokio::test]
    async fn empty_chain_returns_canonical() {
        let s = ChainShortener::new(vec![], Duration::from_millis(10));
        assert_eq!(s.shorten("https://n.test/a?x=1").await, "https://n.test/a");
    }
}
