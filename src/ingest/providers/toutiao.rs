// src/ingest/providers/toutiao.rs
use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "toutiao";
pub const ENDPOINT: &str = "https://www.toutiao.com/hot-event/hot-board/?origin=toutiao_pc";
pub const MAX_ITEMS: usize = 20;

// Field names are capitalised upstream.
pub const RULE: JsonListRule = JsonListRule {
    path: &["data"],
    title_keys: &["Title", "QueryWord"],
    hot_keys: &["HotValue"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Toutiao",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![("Referer", "https://www.toutiao.com/")],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
