// src/enrich/summarize.rs
//! Summarizer capability: provider abstraction + deterministic local fallback.
//!
//! Providers return `None` for every failure mode (no key, network error,
//! non-2xx after retries, unexpected JSON). Callers never see an error; they
//! fall back to `fallback_summary`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::Serialize;
use serde_json::Value;

use crate::config::Settings;
use crate::select::normalize_text;

/// Character budget for a provider summary.
pub const SUMMARY_CHAR_BUDGET: usize = 400;
/// Word budget for the local fallback.
pub const FALLBACK_WORD_BUDGET: usize = 28;

pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// A short summary, or `None` when the provider is unavailable.
    async fn summarize(&self, title: &str, text: &str) -> Option<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynSummarizer = Arc<dyn Summarizer>;

/// Factory: OpenAI when a key is configured, otherwise disabled.
pub fn build_summarizer(settings: &Settings) -> DynSummarizer {
    match settings.openai_api_key.as_deref() {
        Some(key) => Arc::new(OpenAiSummarizer::new(key, &settings.openai_model)),
        None => {
            tracing::info!("summarizer disabled (no OPENAI_API_KEY), using local fallback");
            Arc::new(DisabledSummarizer)
        }
    }
}

/// First `FALLBACK_WORD_BUDGET` words of the whitespace-normalized text.
pub fn fallback_summary(text: &str) -> String {
    normalize_text(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .take(FALLBACK_WORD_BUDGET)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single line, whitespace collapsed, at most `SUMMARY_CHAR_BUDGET` chars.
pub fn clamp_summary(raw: &str) -> String {
    let one_line = normalize_text(raw);
    if one_line.chars().count() <= SUMMARY_CHAR_BUDGET {
        return one_line;
    }
    one_line
        .chars()
        .take(SUMMARY_CHAR_BUDGET)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Provider summary if available and non-empty, local fallback otherwise.
pub async fn summarize_or_fallback(summarizer: &dyn Summarizer, title: &str, text: &str) -> String {
    match summarizer.summarize(title, text).await {
        Some(s) if !s.trim().is_empty() => clamp_summary(&s),
        _ => {
            counter!("digest_summarizer_fallback_total").increment(1);
            tracing::debug!(provider = summarizer.provider_name(), "summary fallback");
            fallback_summary(text)
        }
    }
}

/// Returns `None` always; used when no API key is configured.
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _title: &str, _text: &str) -> Option<String> {
        None
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// OpenAI Responses API, with bounded retry and exponential backoff.
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_attempts: u8,
    backoff_base: Duration,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str, model: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("ai-news-digest/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: OPENAI_RESPONSES_URL.to_string(),
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retries(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    fn backoff(&self, attempt: u8) -> Duration {
        let factor = 1u32
            .checked_shl(u32::from(attempt.saturating_sub(1)))
            .unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    fn prompt(title: &str, text: &str) -> String {
        format!(
            "You are a news editor for a gaming CEO.\n\
             Summarize the following news in 2 crisp sentences, plain English, max 45 words, no emojis, no hype.\n\
             Focus on what changed and why it matters.\n\
             TITLE: {title}\n\
             CONTENT: {text}"
        )
    }

    /// One HTTP round trip. `Err(())` means worth retrying.
    async fn attempt(&self, body: &Req<'_>) -> Result<Option<String>, ()> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "summarizer request failed");
            })?;

        let status = resp.status();
        if status.is_server_error() || status.as_u16() == 429 {
            tracing::debug!(%status, "summarizer transient status");
            return Err(());
        }
        if !status.is_success() {
            tracing::debug!(%status, "summarizer rejected request");
            return Ok(None);
        }
        let json: Value = match resp.json().await {
            Ok(v) => v,
            Err(_) => return Ok(None),
        };
        Ok(extract_output_text(&json))
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    input: Vec<Msg<'a>>,
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, title: &str, text: &str) -> Option<String> {
        if self.api_key.is_empty() {
            return None;
        }
        let prompt = Self::prompt(title, text);
        let body = Req {
            model: &self.model,
            input: vec![Msg {
                role: "user",
                content: &prompt,
            }],
        };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.attempt(&body).await {
                Ok(out) => return out.map(|s| clamp_summary(&s)).filter(|s| !s.is_empty()),
                Err(()) if attempt < self.max_attempts => {
                    tokio::time::sleep(self.backoff(attempt)).await;
                }
                Err(()) => return None,
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Pull the generated text out of a Responses API (or legacy chat) payload.
///
/// Accepted shapes, first hit wins:
/// - `{"output_text": "..."}`
/// - `{"output": {"text": "..."}}`
/// - `{"output": [{"content": [{"type": "output_text", "text": "..."}]}]}`
/// - `{"choices": [{"message": {"content": "..."}}]}`
pub fn extract_output_text(v: &Value) -> Option<String> {
    let non_empty = |s: &str| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    };

    if let Some(s) = v.get("output_text").and_then(Value::as_str).and_then(non_empty) {
        return Some(s);
    }

    match v.get("output") {
        Some(Value::Object(o)) => {
            if let Some(s) = o.get("text").and_then(Value::as_str).and_then(non_empty) {
                return Some(s);
            }
        }
        Some(Value::Array(segments)) => {
            let parts: Vec<&str> = segments
                .iter()
                .filter_map(|seg| seg.get("content").and_then(Value::as_array))
                .flatten()
                .filter(|c| c.get("type").and_then(Value::as_str) == Some("output_text"))
                .filter_map(|c| c.get("text").and_then(Value::as_str))
                .filter(|t| !t.trim().is_empty())
                .collect();
            if !parts.is_empty() {
                return Some(parts.join(" "));
            }
        }
        _ => {}
    }

    v.get("choices")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|ch| ch.pointer("/message/content").and_then(Value::as_str))
        .find_map(non_empty)
}
