// tests/report_format.rs
use chrono::{Duration, Local, TimeZone, Utc};

use hotlist_relay::ingest::types::{BatchResult, FetchOutcome, HotItem};
use hotlist_relay::report::format_report;

fn item(title: &str, hot: Option<&str>, rank: u32) -> HotItem {
    HotItem {
        title: title.into(),
        hot: hot.map(Into::into),
        rank,
    }
}

fn success(key: &str, name: &str, items: Vec<HotItem>) -> FetchOutcome {
    FetchOutcome::Success {
        source_key: key.into(),
        display_name: name.into(),
        items,
        fetched_at: Utc::now(),
    }
}

fn failure(key: &str, name: &str) -> FetchOutcome {
    FetchOutcome::Failure {
        source_key: key.into(),
        display_name: name.into(),
        error: "network error".into(),
        fetched_at: Utc::now(),
    }
}

fn batch(outcomes: Vec<FetchOutcome>) -> (BatchResult, chrono::DateTime<Local>) {
    let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
    let started = now.with_timezone(&Utc) - Duration::milliseconds(1234);
    (
        BatchResult {
            outcomes,
            started_at: started,
            finished_at: started,
        },
        now,
    )
}

#[test]
fn full_layout() {
    let (b, now) = batch(vec![
        success("weibo", "Weibo", vec![item("a", Some("100"), 1), item("b", None, 2)]),
        failure("douyin", "Douyin"),
        success("zhihu", "Zhihu", vec![item("c", Some("9 万热度"), 1)]),
    ]);

    let expected = "📊 Trending now - 2026-10-16 09:30:00\n\
\n\
【Weibo】\n\
1. a (100)\n\
2. b\n\
\n\
【Zhihu】\n\
1. c (9 万热度)\n\
\n\
elapsed: 1234ms\n\
success: 2, failed: 1";
    assert_eq!(format_report(&b, now), expected);
}

#[test]
fn lines_are_renumbered_regardless_of_rank() {
    let (b, now) = batch(vec![success(
        "kuaishou",
        "Kuaishou",
        vec![item("x", None, 4), item("y", None, 9)],
    )]);
    let text = format_report(&b, now);
    assert!(text.contains("\n1. x\n2. y\n"));
}

#[test]
fn empty_success_counts_but_has_no_section() {
    let (b, now) = batch(vec![
        success("douyin", "Douyin", vec![]),
        success("weibo", "Weibo", vec![item("a", None, 1)]),
    ]);
    let text = format_report(&b, now);
    assert!(!text.contains("Douyin"));
    assert!(text.contains("【Weibo】"));
    assert!(text.ends_with("success: 2"));
}

#[test]
fn only_empty_successes_render_no_data() {
    let (b, now) = batch(vec![success("douyin", "Douyin", vec![])]);
    let text = format_report(&b, now);
    assert!(text.contains("\n⚠️ No data available\n"));
    assert!(text.ends_with("success: 1"));
}

#[test]
fn formatting_is_idempotent() {
    let (b, now) = batch(vec![
        success("weibo", "Weibo", vec![item("a", Some("1"), 1)]),
        failure("douban", "Douban"),
    ]);
    assert_eq!(format_report(&b, now), format_report(&b, now));
}
