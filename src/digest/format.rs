// src/digest/format.rs
//! One selected story -> three lines of Telegram Markdown.
//!
//! ```text
//! • *Title*: summary
//! 🔗 https://is.gd/abc
//! 👉 suggested action
//! ```

use crate::enrich::{summarize_or_fallback, suggest_action, DynShortener, DynSummarizer};
use crate::ingest::plain_text;
use crate::ingest::types::FeedEntry;
use crate::select::normalize_text;

/// Legacy Markdown chars that would open an entity mid-text.
fn strip_markdown(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '['))
        .collect()
}

/// Backslash-escape legacy Markdown chars so a URL like `/ai_news` is sent
/// literally instead of opening an italic entity.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub struct ItemFormatter {
    summarizer: DynSummarizer,
    shortener: DynShortener,
}

impl ItemFormatter {
    pub fn new(summarizer: DynSummarizer, shortener: DynShortener) -> Self {
        Self {
            summarizer,
            shortener,
        }
    }

    pub async fn format(&self, entry: &FeedEntry) -> String {
        let title = normalize_text(&entry.title);
        let source_text = match plain_text(&entry.summary) {
            s if s.is_empty() => title.clone(),
            s => s,
        };

        let summary = summarize_or_fallback(self.summarizer.as_ref(), &title, &source_text).await;
        let link = self.shortener.shorten(&entry.link).await;
        let action = suggest_action(&entry.title, &entry.summary);

        let summary_line = if summary.is_empty() || summary == title {
            format!("• *{}*", strip_markdown(&title))
        } else {
            format!("• *{}*: {}", strip_markdown(&title), strip_markdown(&summary))
        };
        format!("{summary_line}\n🔗 {}\n👉 {action}", escape_markdown(&link))
    }

    /// Sequential on purpose: one provider call in flight at a time.
    pub async fn format_all(&self, entries: &[FeedEntry]) -> Vec<String> {
        let mut blocks = Vec::with_capacity(entries.len());
        for e in entries {
            blocks.push(self.format(e).await);
        }
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{CanonicalOnly, DisabledSummarizer, FALLBACK_ACTION};
    use std::sync::Arc;

    fn formatter() -> ItemFormatter {
        ItemFormatter::new(Arc::new(DisabledSummarizer), Arc::new(CanonicalOnly))
    }

    #[tokio::test]
    async fn exactly_three_lines() {
        let e = FeedEntry::new("Quiet   day", "https://n.test/q?utm=1")
            .with_summary("<p>Nothing&nbsp;much happened.</p>");
        let block = formatter().format(&e).await;
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 3, "{block}");
        assert_eq!(lines[0], "• *Quiet day*: Nothing much happened.");
        assert_eq!(lines[1], "🔗 https://n.test/q");
        assert_eq!(lines[2], format!("👉 {FALLBACK_ACTION}"));
    }

    #[tokio::test]
    async fn empty_summary_uses_title_once() {
        let e = FeedEntry::new("Just a headline", "https://n.test/h");
        let block = formatter().format(&e).await;
        assert!(block.starts_with("• *Just a headline*\n"), "{block}");
    }

    #[tokio::test]
    async fn markdown_specials_are_stripped() {
        let e = FeedEntry::new("snake_case *bold* [x]", "https://n.test/m")
            .with_summary("uses `code` and_more");
        let block = formatter().format(&e).await;
        let first = block.lines().next().unwrap();
        assert_eq!(first, "• *snakecase bold x]*: uses code andmore");
    }

    #[tokio::test]
    async fn link_markdown_chars_are_escaped() {
        let e = FeedEntry::new("Roundup", "https://n.test/ai_news/top_3?utm_source=rss");
        let block = formatter().format(&e).await;
        let link_line = block.lines().nth(1).unwrap();
        assert_eq!(link_line, r"🔗 https://n.test/ai\_news/top\_3");
    }

    #[test]
    fn escape_leaves_plain_urls_alone() {
        assert_eq!(escape_markdown("https://is.gd/AbC12"), "https://is.gd/AbC12");
        assert_eq!(escape_markdown("a*b`c[d"), r"a\*b\`c\[d");
    }
}
