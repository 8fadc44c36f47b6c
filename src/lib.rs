// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod ingest;
pub mod select;

// Per-item enrichment (summaries, short links, suggested actions)
pub mod enrich;

// Rendering & delivery
pub mod digest;
pub mod notify;

pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::error::DigestError;
pub use crate::ingest::types::{FeedEntry, FeedFetcher};
pub use crate::pipeline::{build_sections, run_once, Capabilities, Sections};
