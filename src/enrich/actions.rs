// src/enrich/actions.rs
//! Suggested next step for a story, from an ordered keyword table.
//!
//! Rules are checked top to bottom against the lower-cased "title summary"
//! text; the first rule with any matching phrase wins. Order matters: a
//! funding story that also mentions Unity gets the deal action, not the
//! engine one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub patterns: &'static [&'static str],
    pub action: &'static str,
}

pub const ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        patterns: &["raises", "funding", "acquires", "acquisition", "merger", "investment"],
        action: "Track the deal: check for partnership or M&A angles.",
    },
    ActionRule {
        patterns: &["app store", "google play", "store policy", "fees", "sideload"],
        action: "Review store-policy impact on our live titles.",
    },
    ActionRule {
        patterns: &["monetization", "in-app purchase", "ad revenue", "ads sdk", "pricing"],
        action: "Benchmark against our monetization roadmap.",
    },
    ActionRule {
        patterns: &["unity", "unreal", "engine", "sdk", "toolchain"],
        action: "Flag to tech leads for engine and tooling impact.",
    },
    ActionRule {
        patterns: &["regulation", "lawsuit", "privacy", "copyright", "ai act"],
        action: "Loop in legal for a quick risk check.",
    },
    ActionRule {
        patterns: &["open-source", "open source", "model", "llm", "agent"],
        action: "Evaluate for a quick prototype in our AI tooling.",
    },
    ActionRule {
        patterns: &["launch", "release", "rolls out", "available"],
        action: "Try it hands-on and share notes with the team.",
    },
];

pub const FALLBACK_ACTION: &str = "Skim and bring to the weekly sync if relevant.";

/// Total: every input maps to exactly one action.
pub fn suggest_action(title: &str, summary: &str) -> &'static str {
    let text = format!("{title} {summary}").to_lowercase();
    ACTION_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| text.contains(p)))
        .map_or(FALLBACK_ACTION, |rule| rule.action)
}
