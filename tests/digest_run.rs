// tests/digest_run.rs
mod common;

use std::sync::Arc;

use common::{quick_policy, RecordingNotifier, Reply, ScriptedTransport};
use hotlist_relay::ingest::providers::weibo;
use hotlist_relay::summarize::{summarize_or_original, DisabledSummarizer, MockSummarizer};
use hotlist_relay::{DeliveryMode, Digest};

fn digest(summary: Option<&str>, notifier: RecordingNotifier) -> Digest {
    let t = ScriptedTransport::new().always(
        "https://mock.test/weibo",
        Reply::Ok(200, common::fixture("weibo.json")),
    );
    Digest::new(
        vec![weibo::spec().with_endpoint("https://mock.test/weibo")],
        t.fetcher(quick_policy(0)),
        Arc::new(MockSummarizer {
            fixed: summary.map(Into::into),
        }),
        Arc::new(notifier),
    )
}

#[tokio::test]
async fn summarized_mode_sends_summary() {
    let n = RecordingNotifier::default();
    let report = digest(Some("tl;dr"), n.clone())
        .run(DeliveryMode::Summarized)
        .await
        .unwrap();
    assert!(report.delivered);
    assert_eq!(report.text, "tl;dr");
    assert_eq!(n.messages(), vec!["tl;dr".to_string()]);
}

#[tokio::test]
async fn failing_summarizer_falls_back_to_raw_report() {
    let n = RecordingNotifier::default();
    let report = digest(None, n.clone()).run(DeliveryMode::Summarized).await.unwrap();
    assert!(report.text.starts_with("📊 Trending now - "));
    assert!(report.text.ends_with("success: 1"));
}

#[tokio::test]
async fn blank_summary_counts_as_failure() {
    let s = MockSummarizer {
        fixed: Some("   ".into()),
    };
    assert_eq!(summarize_or_original(&s, "raw").await, "raw");
    assert_eq!(summarize_or_original(&DisabledSummarizer, "raw").await, "raw");
}

#[tokio::test]
async fn raw_mode_ignores_summarizer() {
    let n = RecordingNotifier::default();
    let d = digest(Some("tl;dr"), n.clone());
    let batch = d.collect().await.unwrap();
    let text = d.compose(&batch, DeliveryMode::Raw).await;
    assert!(text.contains("【Weibo】\n1. 台风登陆浙江 (2345678)\n"));
    assert!(n.messages().is_empty());
}

#[tokio::test]
async fn delivery_failure_is_reported_not_raised() {
    let report = digest(Some("x"), RecordingNotifier::failing())
        .run(DeliveryMode::Raw)
        .await
        .unwrap();
    assert!(!report.delivered);
    assert_eq!(report.batch.success_count(), 1);
}
