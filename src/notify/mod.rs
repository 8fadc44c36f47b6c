// src/notify/mod.rs
pub mod telegram;

use anyhow::Result;

pub use telegram::TelegramNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Post `text` as one message. An error here ends the run.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Dry-run sink: prints the message instead of posting it.
pub struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}
