// src/error.rs
use thiserror::Error;

/// Errors that end a run. Everything else (a dead feed, a failed summary or
/// short link) is absorbed where it happens.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("sources config error: {0}")]
    Sources(String),

    #[error("delivery failed after {attempts} attempt(s): {message}")]
    Delivery { attempts: u8, message: String },
}
