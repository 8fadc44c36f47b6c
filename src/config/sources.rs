// src/config/sources.rs
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DigestError;

pub const ENV_SOURCES_PATH: &str = "DIGEST_SOURCES_PATH";

pub const GENERAL_AI: &str = "general_ai";
pub const MOBILE_GAMING: &str = "mobile_gaming";

/// Category name -> ordered feed URLs, as read from `config/sources.*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSources {
    categories: BTreeMap<String, Vec<String>>,
}

impl FeedSources {
    pub fn from_categories<I, K, V>(categories: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let categories = categories
            .into_iter()
            .map(|(k, urls)| (k.into(), clean_urls(urls.into_iter().map(Into::into))))
            .collect();
        Self { categories }
    }

    /// URLs for `category` in file order; unknown categories are empty.
    pub fn urls(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn general_ai(&self) -> &[String] {
        self.urls(GENERAL_AI)
    }

    pub fn mobile_gaming(&self) -> &[String] {
        self.urls(MOBILE_GAMING)
    }

    pub fn total_feeds(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Load sources from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<FeedSources> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load sources using env var + fallbacks:
/// 1) $DIGEST_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
///
/// A missing file is an error: a run without sources has nothing to post.
pub fn load_sources_default() -> Result<FeedSources> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(DigestError::Sources(format!(
                "{ENV_SOURCES_PATH} points to non-existent path {}",
                pb.display()
            ))
            .into());
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Err(DigestError::Sources(format!(
        "no sources file found (set {ENV_SOURCES_PATH} or add config/sources.toml)"
    ))
    .into())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<FeedSources> {
    let raw: BTreeMap<String, Vec<String>> = match hint_ext {
        "json" => serde_json::from_str(s).context("parsing sources json")?,
        "toml" => toml::from_str(s).context("parsing sources toml")?,
        // No usable extension: sniff JSON first, then TOML.
        _ => match serde_json::from_str(s) {
            Ok(v) => v,
            Err(_) => toml::from_str(s).map_err(|_| anyhow!("unsupported sources format"))?,
        },
    };
    Ok(FeedSources::from_categories(raw))
}

fn clean_urls(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_keep_order_and_drop_blanks() {
        let toml = r#"
general_ai = [" https://a.test/feed ", "", "https://b.test/rss"]
mobile_gaming = ["https://m.test/atom"]
"#;
        let t = parse_sources(toml, "toml").unwrap();
        assert_eq!(
            t.general_ai(),
            ["https://a.test/feed".to_string(), "https://b.test/rss".into()]
        );
        assert_eq!(t.mobile_gaming(), ["https://m.test/atom".to_string()]);

        let json = r#"{"general_ai": ["https://b.test/rss", "https://a.test/feed"]}"#;
        let j = parse_sources(json, "json").unwrap();
        assert_eq!(
            j.general_ai(),
            ["https://b.test/rss".to_string(), "https://a.test/feed".into()]
        );
        assert!(j.mobile_gaming().is_empty());
    }

    #[test]
    fn sniffs_format_without_extension() {
        let j = parse_sources(r#"{"mobile_gaming": ["https://x.test"]}"#, "").unwrap();
        assert_eq!(j.total_feeds(), 1);
        let t = parse_sources(r#"general_ai = ["https://y.test"]"#, "").unwrap();
        assert_eq!(t.general_ai().len(), 1);
        assert!(parse_sources("not a config", "").is_err());
    }
}
