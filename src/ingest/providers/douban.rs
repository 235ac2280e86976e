// src/ingest/providers/douban.rs
//! Douban real-time hot movies. The rexxar API rejects requests without a
//! mobile-site Referer.

use crate::ingest::parse::{JsonListRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "douban";
pub const ENDPOINT: &str = "https://m.douban.com/rexxar/api/v2/subject_collection/movie_real_time_hotest/items?start=0&count=10";
pub const MAX_ITEMS: usize = 10;

pub const RULE: JsonListRule = JsonListRule {
    path: &["subject_collection_items"],
    title_keys: &["title"],
    hot_keys: &["card_subtitle"],
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Douban",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![("Referer", "https://m.douban.com/movie/")],
        enabled: true,
        parse: ParseStrategy::JsonList(RULE),
    }
}
