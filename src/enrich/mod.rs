// src/enrich/mod.rs
pub mod actions;
pub mod shorten;
pub mod summarize;

pub use actions::{suggest_action, ActionRule, ACTION_RULES, FALLBACK_ACTION};
pub use shorten::{CanonicalOnly, ChainShortener, DynShortener, ShortenProvider, Shortener};
pub use summarize::{
    build_summarizer, fallback_summary, summarize_or_fallback, DisabledSummarizer,
    DynSummarizer, OpenAiSummarizer, Summarizer,
};
