// src/ingest/providers/zhihu.rs
//! Zhihu hot list. Items nest the question under `target`; the heat text
//! ("1234 万热度") sits either on the item or in the target's metrics area.

use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "zhihu";
pub const ENDPOINT: &str = "https://www.zhihu.com/api/v3/feed/topstory/hot-lists/total?limit=50";
pub const MAX_ITEMS: usize = 20;

pub const RULE: JsonListRule = JsonListRule {
    path: &["data"],
    title_keys: &["target.title", "target.title_area.text"],
    hot_keys: &["detail_text", "target.metrics_area.text"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Zhihu",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![("Referer", "https://www.zhihu.com/hot")],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
