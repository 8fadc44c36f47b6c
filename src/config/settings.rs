// src/config/settings.rs
//! Process-wide settings, read once at startup and handed to every capability.
//!
//! Nothing below the `main` entrypoint touches the environment directly; tests
//! build a `Settings` from a plain lookup closure instead.

use chrono::{FixedOffset, Offset, Utc};

use crate::error::DigestError;

pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_SPLIT_MESSAGES: &str = "DIGEST_SPLIT_MESSAGES";
pub const ENV_TZ_OFFSET_HOURS: &str = "DIGEST_TZ_OFFSET_HOURS";
pub const ENV_TOP_K: &str = "DIGEST_TOP_K";
pub const ENV_DRY_RUN: &str = "DIGEST_DRY_RUN";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
/// Europe/Istanbul has no DST, so a fixed +03:00 offset is exact.
pub const DEFAULT_TZ_OFFSET_HOURS: i32 = 3;
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    /// Absent key means summaries fall back to the local word cut.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Post each section as its own message instead of one combined digest.
    pub split_messages: bool,
    pub tz_offset_hours: i32,
    pub top_k: usize,
    /// Print the digest to stdout instead of posting it.
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            split_messages: false,
            tz_offset_hours: DEFAULT_TZ_OFFSET_HOURS,
            top_k: DEFAULT_TOP_K,
            dry_run: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tz_offset_hours = match get(ENV_TZ_OFFSET_HOURS) {
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|h| (-23..=23).contains(h))
                .ok_or(DigestError::InvalidSetting {
                    key: ENV_TZ_OFFSET_HOURS,
                    value: raw,
                })?,
            None => DEFAULT_TZ_OFFSET_HOURS,
        };

        let top_k = match get(ENV_TOP_K) {
            Some(raw) => raw.parse::<usize>().map_err(|_| DigestError::InvalidSetting {
                key: ENV_TOP_K,
                value: raw,
            })?,
            None => DEFAULT_TOP_K,
        };

        Ok(Self {
            telegram_bot_token: get(ENV_TELEGRAM_BOT_TOKEN),
            telegram_chat_id: get(ENV_TELEGRAM_CHAT_ID),
            openai_api_key: get(ENV_OPENAI_API_KEY),
            openai_model: get(ENV_OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            split_messages: get(ENV_SPLIT_MESSAGES).is_some_and(|v| parse_flag(&v)),
            tz_offset_hours,
            top_k,
            dry_run: get(ENV_DRY_RUN).is_some_and(|v| parse_flag(&v)),
        })
    }

    /// Bot token and chat id, both required to post anything.
    pub fn telegram_credentials(&self) -> Result<(&str, &str), DigestError> {
        let token = self
            .telegram_bot_token
            .as_deref()
            .ok_or(DigestError::MissingSetting(ENV_TELEGRAM_BOT_TOKEN))?;
        let chat = self
            .telegram_chat_id
            .as_deref()
            .ok_or(DigestError::MissingSetting(ENV_TELEGRAM_CHAT_ID))?;
        Ok((token, chat))
    }

    pub fn tz_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
