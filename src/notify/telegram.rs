// src/notify/telegram.rs
use super::Notifier;
use crate::config::Settings;
use crate::error::DigestError;
use anyhow::Result;
use metrics::counter;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramNotifier {
    api_base: String,
    token: String,
    chat_id: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
    backoff_base: Duration,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_base: TELEGRAM_API_BASE.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            client: Client::new(),
            timeout: Duration::from_secs(20),
            max_retries: 3,
            backoff_base: Duration::from_secs(2),
        }
    }

    /// Fails with `MissingSetting` when the token or chat id is absent.
    pub fn from_settings(settings: &Settings) -> Result<Self, DigestError> {
        let (token, chat_id) = settings.telegram_credentials()?;
        Ok(Self::new(token, chat_id))
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }

    fn backoff(&self, attempt: u8) -> Duration {
        let factor = 1u32
            .checked_shl(u32::from(attempt.saturating_sub(1)))
            .unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    pub async fn send_message(&self, text: &str) -> Result<(), DigestError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };
        let url = self.endpoint();

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            // Never echo the URL: it carries the bot token.
            let (failure, transient) = match res {
                Ok(rsp) => {
                    let status = rsp.status();
                    if status.is_success() {
                        counter!("digest_messages_sent_total").increment(1);
                        return Ok(());
                    }
                    let body = rsp.text().await.unwrap_or_default();
                    (
                        format!("Telegram HTTP error: {status} {}", body.trim()),
                        is_transient(status),
                    )
                }
                Err(e) => (format!("Telegram request failed: {}", e.without_url()), true),
            };

            if transient && attempt < self.max_retries {
                tracing::warn!(attempt, error = %failure, "telegram send failed, retrying");
                tokio::time::sleep(self.backoff(attempt)).await;
                continue;
            }
            return Err(DigestError::Delivery {
                attempts: attempt,
                message: failure,
            });
        }
    }
}

/// 5xx and 429 may clear up; any other 4xx (bad markup, bot removed from
/// the chat) fails the same way on every attempt.
fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.send_message(text).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}
