// src/select/fingerprint.rs
//! Story identity: normalized title + canonical link, hashed.

use once_cell::sync::OnceCell;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::ingest::types::FeedEntry;

/// Hex chars kept from the SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// Drop the query string (tracking params and friends).
pub fn canonical_url(u: &str) -> String {
    match u.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => u.to_string(),
    }
}

pub fn fingerprint(title: &str, link: &str) -> Fingerprint {
    let key = format!("{}{}", normalize_text(title), canonical_url(link));
    let hex = format!("{:x}", Sha256::digest(key.as_bytes()));
    Fingerprint(hex[..FINGERPRINT_LEN].to_string())
}

impl FeedEntry {
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.title, &self.link)
    }

    /// Entries without a usable title or link never take part in ranking.
    pub fn is_selectable(&self) -> bool {
        !normalize_text(&self.title).is_empty() && !canonical_url(&self.link).is_empty()
    }
}
