// src/ingest/providers/douyin.rs
use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "douyin";
pub const ENDPOINT: &str = "https://www.douyin.com/aweme/v1/web/hot/search/list/";
pub const MAX_ITEMS: usize = 20;

pub const RULE: JsonListRule = JsonListRule {
    path: &["data", "word_list"],
    title_keys: &["word"],
    hot_keys: &["hot_value"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Douyin",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![("Referer", "https://www.douyin.com/")],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
