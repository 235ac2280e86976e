// src/ingest/parse.rs
//! Parse strategies shared by all platform adapters.
//!
//! - [`JsonListRule`]: the response is JSON; walk a fixed path to an array and
//!   pick title/hotness from a list of field aliases.
//! - [`EmbeddedRule`]: the response is HTML with per-item JSON-ish objects
//!   embedded in a script; scan, normalize, parse, and fall back to plain
//!   regex extraction when the fragment is still not valid JSON.
//!
//! Shape problems never fail a source: they shrink the list (possibly to
//! empty). Only an undecodable JSON document is reported as [`ParseError`].

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

use crate::error::ParseError;
use crate::ingest::types::HotItem;

#[derive(Debug, Clone)]
pub enum ParseStrategy {
    JsonList(JsonListRule),
    EmbeddedJson(EmbeddedRule),
}

impl ParseStrategy {
    pub fn apply(&self, source_key: &str, body: &str) -> Result<Vec<HotItem>, ParseError> {
        match self {
            ParseStrategy::JsonList(rule) => rule.apply(source_key, body),
            ParseStrategy::EmbeddedJson(rule) => rule.apply(source_key, body),
        }
    }

    pub fn max_items(&self) -> usize {
        match self {
            ParseStrategy::JsonList(rule) => rule.max_items,
            ParseStrategy::EmbeddedJson(rule) => rule.max_items,
        }
    }

    /// Compile-time style checks on the rule itself (regex validity).
    pub fn check(&self) -> Result<(), String> {
        match self {
            ParseStrategy::JsonList(_) => Ok(()),
            ParseStrategy::EmbeddedJson(rule) => rule.compile().map(|_| ()).map_err(|e| e.to_string()),
        }
    }
}

/* ----------------------------
Structured JSON extraction
---------------------------- */

#[derive(Debug, Clone)]
pub struct JsonListRule {
    /// Object keys leading to the item array, e.g. `["data", "realtime"]`.
    pub path: &'static [&'static str],
    /// Title aliases in precedence order; dotted aliases walk sub-objects.
    pub title_keys: &'static [&'static str],
    pub hot_keys: &'static [&'static str],
    pub max_items: usize,
}

impl JsonListRule {
    pub fn apply(&self, source_key: &str, body: &str) -> Result<Vec<HotItem>, ParseError> {
        let doc: Value = serde_json::from_str(body.trim_start_matches('\u{feff}')).map_err(|e| {
            ParseError::Malformed {
                source_key: source_key.to_string(),
                reason: e.to_string(),
            }
        })?;

        let Some(list) = walk(&doc, self.path.iter().copied()).and_then(Value::as_array) else {
            tracing::debug!(source = source_key, path = ?self.path, "item list missing or not an array");
            return Ok(Vec::new());
        };

        let items = list
            .iter()
            .take(self.max_items)
            .filter_map(|entry| {
                let title = first_label(entry, self.title_keys)?;
                Some((clean_title(&title), first_label(entry, self.hot_keys)))
            })
            .filter(|(title, _)| !title.is_empty())
            .enumerate()
            .map(|(i, (title, hot))| HotItem {
                title,
                hot,
                rank: i as u32 + 1,
            })
            .collect::<Vec<_>>();

        if items.len() < list.len().min(self.max_items) {
            tracing::debug!(
                source = source_key,
                kept = items.len(),
                "dropped entries without a usable title"
            );
        }
        Ok(items)
    }
}

fn walk<'v, 'k>(root: &'v Value, path: impl IntoIterator<Item = &'k str>) -> Option<&'v Value> {
    path.into_iter().try_fold(root, |v, key| v.get(key))
}

/// First alias whose value is present and non-empty.
fn first_label(entry: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|alias| walk(entry, alias.split('.')).and_then(label_of))
}

/// Display text of a scalar. `null`, `""` and numeric zero count as absent.
pub fn label_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => {
            let zero = n.as_f64().is_some_and(|f| f == 0.0);
            (!zero).then(|| n.to_string())
        }
        _ => None,
    }
}

/// Decode HTML entities and collapse inner whitespace.
pub fn clean_title(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/* ----------------------------
Embedded JSON in markup
---------------------------- */

#[derive(Debug, Clone)]
pub struct EmbeddedRule {
    /// Regex whose first capture group starts at one item object (`{...}`).
    /// The object is then extended to its balanced closing brace.
    pub fragment_pattern: &'static str,
    pub rank_key: &'static str,
    pub name_keys: &'static [&'static str],
    pub hot_key: &'static str,
    /// Added to the upstream rank (upstream ranks are 0-based).
    pub rank_offset: u32,
    pub max_items: usize,
}

impl EmbeddedRule {
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        cached_regex(self.fragment_pattern)
    }

    pub fn apply(&self, source_key: &str, body: &str) -> Result<Vec<HotItem>, ParseError> {
        let re = self.compile().map_err(|e| ParseError::Pattern {
            source_key: source_key.to_string(),
            reason: e.to_string(),
        })?;

        let mut items = Vec::new();
        let mut dropped = 0usize;
        for caps in re.captures_iter(body) {
            let Some(group) = caps.get(1) else {
                continue;
            };
            // a nested object cuts the match short; fall back to the raw
            // group when the braces never balance
            let fragment = balanced_object(body, group.start()).unwrap_or(group.as_str());
            match self.extract(fragment) {
                Some(item) => items.push(item),
                None => dropped += 1,
            }
        }

        items.sort_by_key(|it| it.rank);
        items.dedup_by_key(|it| it.rank);
        items.truncate(self.max_items);

        if dropped > 0 {
            tracing::debug!(source = source_key, dropped, "fragments without rank+name");
        }
        Ok(items)
    }

    /// Structured parse first, regex extraction second.
    pub fn extract(&self, fragment: &str) -> Option<HotItem> {
        let (rank, title, hot) = self
            .extract_structured(fragment)
            .or_else(|| self.extract_by_regex(fragment))?;
        let rank = rank.checked_add(self.rank_offset).filter(|r| *r >= 1)?;
        let title = clean_title(&title);
        if title.is_empty() {
            return None;
        }
        Some(HotItem { title, hot, rank })
    }

    fn extract_structured(&self, fragment: &str) -> Option<(u32, String, Option<String>)> {
        let normalized = normalize_fragment(fragment);
        let obj: Value = serde_json::from_str(&normalized).ok()?;
        let rank = match obj.get(self.rank_key)? {
            Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        let title = self
            .name_keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(label_of))?;
        let hot = obj.get(self.hot_key).and_then(label_of);
        Some((rank, title, hot))
    }

    fn extract_by_regex(&self, fragment: &str) -> Option<(u32, String, Option<String>)> {
        let rank = capture_field(fragment, self.rank_key, r"(\d+)")?.parse().ok()?;
        let title = self
            .name_keys
            .iter()
            .find_map(|k| capture_field(fragment, k, r#""([^"]+)""#))?;
        let hot = capture_field(fragment, self.hot_key, r#""?([^",}]+)"?"#)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        Some((rank, title, hot))
    }
}

/// `key: <value_pattern>` with the key optionally quoted.
fn capture_field(fragment: &str, key: &str, value_pattern: &str) -> Option<String> {
    let pattern = format!(
        r#"(?:^|[{{,])\s*"?{}"?\s*:\s*{}"#,
        regex::escape(key),
        value_pattern
    );
    let re = cached_regex(&pattern).ok()?;
    re.captures(fragment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Compiled patterns, keyed by source text. Rules and field patterns are a
/// small fixed set, so the map stays tiny.
fn cached_regex(pattern: &str) -> Result<Regex, regex::Error> {
    static CACHE: OnceCell<Mutex<HashMap<String, Regex>>> = OnceCell::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(re) = cache.lock().unwrap_or_else(|e| e.into_inner()).get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    cache
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// The `{...}` object starting at byte `start`, with nested objects and
/// string literals taken into account. `None` when `start` is not `{` or the
/// braces never close.
pub fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let tail = text.get(start..)?;
    if !tail.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in tail.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return tail.get(..=i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Best-effort conversion of a JS object literal into JSON:
/// unescape `/`, quote bare keys, drop trailing commas.
pub fn normalize_fragment(raw: &str) -> String {
    static RE_SLASH: OnceCell<Regex> = OnceCell::new();
    static RE_BARE_KEY: OnceCell<Regex> = OnceCell::new();
    static RE_TRAILING: OnceCell<Regex> = OnceCell::new();

    let re_slash = RE_SLASH.get_or_init(|| Regex::new(r"(?i)\\u002f").unwrap());
    let re_key = RE_BARE_KEY
        .get_or_init(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());
    let re_trailing = RE_TRAILING.get_or_init(|| Regex::new(r",\s*([}\]])").unwrap());

    let out = re_slash.replace_all(raw, "/");
    let out = re_key.replace_all(&out, r#"$1"$2":"#);
    re_trailing.replace_all(&out, "$1").into_owned()
}
