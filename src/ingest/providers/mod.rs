// src/ingest/providers/mod.rs
//! Platform adapters. Each module contributes a [`SourceSpec`]; the order of
//! [`default_sources`] is the order of sections in the report.

pub mod bilibili;
pub mod douban;
pub mod douyin;
pub mod kuaishou;
pub mod toutiao;
pub mod weibo;
pub mod zhihu;

use crate::config::SourcesConfig;
use crate::ingest::types::SourceSpec;

pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        weibo::spec(),
        douyin::spec(),
        zhihu::spec(),
        bilibili::spec(),
        kuaishou::spec(),
        toutiao::spec(),
        douban::spec(),
    ]
}

/// Default table with `[sources].disabled` applied.
pub fn configured_sources(cfg: &SourcesConfig) -> Vec<SourceSpec> {
    default_sources()
        .into_iter()
        .map(|s| {
            let enabled = cfg.is_enabled(s.key);
            s.with_enabled(enabled)
        })
        .collect()
}
