//! Widget configuration.
//!
//! Values come from `assets/config.env`, compiled into the binary. Native builds
//! also read a `.env` file and the process environment, both of which win over
//! the bundled values; the browser build only has the bundled file.

use crate::faq::{FaqIndex, FaqSource};
use anyhow::Context;
use std::collections::HashMap;
use std::time::Duration;

/// Bundled config, the only source available in the browser
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");
const BUNDLED_FAQ: &str = include_str!("../assets/faq.json");

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(35_000);
/// Longest accepted request timeout. The browser timer cannot go past `u32::MAX` ms.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

pub const API_URL_VAR: &str = "PPG_API_URL";
pub const TIMEOUT_VAR: &str = "PPG_REQUEST_TIMEOUT_MS";
pub const FAQ_FILE_VAR: &str = "PPG_FAQ_FILE";
pub const FAQ_AUTOSEND_VAR: &str = "PPG_FAQ_AUTOSEND";

/// What the send controller needs to reach the endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct SendSettings {
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetConfig {
    pub send: SendSettings,
    pub faq: FaqIndex,
    /// Submit an FAQ question as soon as it is picked.
    pub faq_autosend: bool,
}

impl WidgetConfig {
    /// Load from every source available on this target.
    pub fn load() -> Self {
        let bundled = parse_env_lines(BUNDLED_CONFIG);
        Self::from_lookup(|key| env_override(key).or_else(|| bundled.get(key).cloned()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup(API_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if endpoint.is_none() {
            tracing::warn!("{API_URL_VAR} is not set, messages will fail locally");
        }

        let timeout = lookup(TIMEOUT_VAR)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 && Duration::from_millis(ms) <= MAX_TIMEOUT => {
                    Some(Duration::from_millis(ms))
                }
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}");
                    None
                }
            })
            .unwrap_or(DEFAULT_TIMEOUT);

        let faq = match load_faq_sources(lookup(FAQ_FILE_VAR).as_deref()) {
            Ok(sources) => FaqIndex::new(sources),
            Err(err) => {
                tracing::warn!("FAQ disabled: {err:#}");
                FaqIndex::default()
            }
        };

        Self {
            send: SendSettings { endpoint, timeout },
            faq,
            faq_autosend: lookup(FAQ_AUTOSEND_VAR).is_some_and(|raw| is_truthy(&raw)),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(target_arch = "wasm32")]
fn env_override(_key: &str) -> Option<String> {
    None
}

/// Read `.env` into the process environment (desktop dev).
#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {}

/// FAQ records from `path` when given, otherwise the bundled list.
pub fn load_faq_sources(path: Option<&str>) -> anyhow::Result<Vec<FaqSource>> {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => {
            let raw = read_faq_file(path)?;
            parse_faq(&raw).with_context(|| format!("parsing FAQ file {path}"))
        }
        None => parse_faq(BUNDLED_FAQ).context("parsing bundled FAQ"),
    }
}

/// Parse a JSON array of FAQ records. Entries that are not objects are skipped.
pub fn parse_faq(raw: &str) -> anyhow::Result<Vec<FaqSource>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value(record) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::warn!(index = i, %err, "skipping FAQ record");
                None
            }
        })
        .collect())
}

#[cfg(not(target_arch = "wasm32"))]
fn read_faq_file(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading FAQ file {path}"))
}

#[cfg(target_arch = "wasm32")]
fn read_faq_file(path: &str) -> anyhow::Result<String> {
    anyhow::bail!("cannot read FAQ file {path} in the browser")
}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_lines(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_env_lines() {
        let parsed = parse_env_lines("# comment\n\nPPG_API_URL = https://x.test/\nBROKEN\nA=b=c\n");
        assert_eq!(parsed.get("PPG_API_URL").map(String::as_str), Some("https://x.test/"));
        assert_eq!(parsed.get("A").map(String::as_str), Some("b=c"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = WidgetConfig::from_lookup(|_| None);
        assert_eq!(config.send.endpoint, None);
        assert_eq!(config.send.timeout, DEFAULT_TIMEOUT);
        assert!(!config.faq_autosend);
        assert!(!config.faq.is_empty(), "bundled FAQ should load");
    }

    #[test]
    fn blank_endpoint_counts_as_missing() {
        let config = WidgetConfig::from_lookup(lookup_from(&[(API_URL_VAR, "   ")]));
        assert_eq!(config.send.endpoint, None);
    }

    #[test]
    fn reads_timeout_and_autosend() {
        let config = WidgetConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "https://chat.test/"),
            (TIMEOUT_VAR, "1500"),
            (FAQ_AUTOSEND_VAR, "Yes"),
        ]));
        assert_eq!(config.send.endpoint.as_deref(), Some("https://chat.test/"));
        assert_eq!(config.send.timeout, Duration::from_millis(1500));
        assert!(config.faq_autosend);
    }

    #[test]
    fn invalid_timeout_falls_back() {
        for raw in ["soon", "0", "-5", "86400001", "18446744073709551615"] {
            let config = WidgetConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, raw)]));
            assert_eq!(config.send.timeout, DEFAULT_TIMEOUT);
        }
    }

    #[test]
    fn unreadable_faq_file_disables_faq() {
        let config = WidgetConfig::from_lookup(lookup_from(&[(
            FAQ_FILE_VAR,
            "/definitely/not/here/faq.json",
        )]));
        assert!(config.faq.is_empty());
    }

    #[test]
    fn bundled_files_parse() {
        assert!(parse_env_lines(BUNDLED_CONFIG).contains_key(API_URL_VAR));
        assert!(!load_faq_sources(None).unwrap().is_empty());
    }

    #[test]
    fn longest_timeout_is_accepted() {
        let config = WidgetConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "86400000")]));
        assert_eq!(config.send.timeout, MAX_TIMEOUT);
    }

    #[test]
    fn one_odd_faq_record_keeps_the_rest() {
        let sources = parse_faq(r#"[{"id":1,"q":"a"},{"q":"b"}]"#).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id, "1");

        let sources = parse_faq(r#"[{"q":"kept"},"stray",42,{"q":"also kept"}]"#).unwrap();
        let questions: Vec<&str> = sources.iter().map(|s| s.q.as_str()).collect();
        assert_eq!(questions, vec!["kept", "also kept"]);
    }

    #[test]
    fn every_bundled_tag_narrows_the_list() {
        let index = FaqIndex::new(load_faq_sources(None).unwrap());
        let total = index.items().len();
        for tag in index.tags() {
            let matched = index.filter_by_tag(&tag).len();
            assert!(matched < total, "tag {tag} matched {matched} of {total}");
        }
    }

    #[test]
    fn malformed_faq_is_an_error() {
        assert!(parse_faq(r#"{"q":"not a list"}"#).is_err());
    }
}
