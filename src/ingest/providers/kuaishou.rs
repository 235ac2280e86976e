// src/ingest/providers/kuaishou.rs
//! Kuaishou has no public JSON list. The home page embeds the Apollo cache
//! in a script tag, one `"VisionHotRankItem:<id>": {...}` object per entry,
//! with 0-based ranks and `/`-escaped slashes. Items carry nested objects
//! (`photoIds`), so the pattern only anchors the opening brace.

use crate::ingest::parse::{EmbeddedRule, ParseStrategy};
use crate::ingest::types::SourceSpec;

pub const KEY: &str = "kuaishou";
pub const ENDPOINT: &str = "https://www.kuaishou.com/?isHome=1";
pub const MAX_ITEMS: usize = 10;

pub const RULE: EmbeddedRule = EmbeddedRule {
    fragment_pattern: r#""VisionHotRankItem:[^"]+"\s*:\s*(\{[^}]*\})"#,
    rank_key: "rank",
    name_keys: &["name", "id"],
    hot_key: "hotValue",
    rank_offset: 1,
    max_items: MAX_ITEMS,
};

pub fn spec() -> SourceSpec {
    SourceSpec {
        key: KEY,
        display_name: "Kuaishou",
        endpoint: ENDPOINT.to_string(),
        request_headers: vec![
            ("Referer", "https://www.kuaishou.com/"),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        ],
        enabled: true,
        parse: ParseStrategy::EmbeddedJson(RULE),
    }
}
