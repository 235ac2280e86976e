// src/ingest/providers/bilibili.rs
use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "bilibili";
pub const ENDPOINT: &str = "https://api.bilibili.com/x/web-interface/search/square?limit=50";
pub const MAX_ITEMS: usize = 20;

/// `show_name` is what the site renders; `keyword` is the raw search term.
pub const RULE: JsonListRule = JsonListRule {
    path: &["data", "trending", "list"],
    title_keys: &["show_name", "keyword"],
    hot_keys: &["heat_score"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Bilibili",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![("Referer", "https://www.bilibili.com/")],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
