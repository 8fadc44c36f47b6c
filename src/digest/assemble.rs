// src/digest/assemble.rs
//! Digest layout. Exact blank-line spacing is part of the contract: the chat
//! client renders it as-is.

use chrono::{DateTime, FixedOffset};

pub const GAMING_SECTION_TITLE: &str = "🎮 AI in Mobile Gaming";
pub const GENERAL_SECTION_TITLE: &str = "🤖 AI in General";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaders {
    pub gaming: String,
    pub general: String,
}

impl SectionHeaders {
    /// Bold headers with item count and local date, e.g.
    /// `*🎮 AI in Mobile Gaming — Top 3 (Sep 06, 2025)*`.
    pub fn dated(local_now: DateTime<FixedOffset>, gaming_count: usize, general_count: usize) -> Self {
        let date = local_now.format("%b %d, %Y");
        Self {
            gaming: format!("*{GAMING_SECTION_TITLE} — Top {gaming_count} ({date})*"),
            general: format!("*{GENERAL_SECTION_TITLE} — Top {general_count} ({date})*"),
        }
    }
}

/// ```text
/// <blank>
/// gaming header
/// (<blank>, block) per gaming item
/// <blank>
/// <blank>
/// general header
/// (<blank>, block) per general item
/// ```
pub fn assemble(gaming_blocks: &[String], general_blocks: &[String], headers: &SectionHeaders) -> String {
    let mut lines: Vec<&str> = vec!["", headers.gaming.as_str()];
    for block in gaming_blocks {
        lines.push("");
        lines.push(block);
    }
    lines.push("");
    lines.push("");
    lines.push(headers.general.as_str());
    for block in general_blocks {
        lines.push("");
        lines.push(block);
    }
    lines.join("\n")
}

/// One section on its own, for the two-message delivery mode.
pub fn assemble_section(header: &str, blocks: &[String]) -> String {
    let mut lines: Vec<&str> = vec![header];
    for block in blocks {
        lines.push("");
        lines.push(block);
    }
    lines.join("\n")
}
