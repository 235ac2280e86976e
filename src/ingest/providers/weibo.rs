// src/ingest/providers/weibo.rs
//! Weibo side-bar hot search (`/ajax/side/hotSearch`), plain JSON.

use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "weibo";
pub const ENDPOINT: &str = "https://weibo.com/ajax/side/hotSearch";
pub const MAX_ITEMS: usize = 20;

/// `word` is the display phrase; promoted entries only carry `word_scheme`.
/// `num` is the heat count, `realpos` the live position when `num` is absent.
pub const RULE: JsonListRule = JsonListRule {
    path: &["data", "realtime"],
    title_keys: &["word", "word_scheme"],
    hot_keys: &["num", "realpos"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Weibo",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![
            ("Referer", "https://weibo.com/"),
            ("Connection", "keep-alive"),
        ],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
