// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

mod common;

use std::sync::Arc;

use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use common::{quick_policy, RecordingNotifier, Reply, ScriptedTransport};
use hotlist_relay::api::{create_router, AppState};
use hotlist_relay::ingest::providers::{douyin, weibo};
use hotlist_relay::summarize::MockSummarizer;
use hotlist_relay::Digest;

const BODY_LIMIT: usize = 1024 * 1024;

fn router_with(notifier: RecordingNotifier) -> Router {
    let t = ScriptedTransport::new()
        .always("https://mock.test/weibo", Reply::Ok(200, common::fixture("weibo.json")))
        .always("https://mock.test/douyin", Reply::NetErr("refused"));
    let sources = vec![
        weibo::spec().with_endpoint("https://mock.test/weibo"),
        douyin::spec().with_endpoint("https://mock.test/douyin"),
    ];
    let digest = Digest::new(
        sources,
        t.fetcher(quick_policy(0)),
        Arc::new(MockSummarizer {
            fixed: Some("summary text".into()),
        }),
        Arc::new(notifier),
    );
    create_router(AppState::new(digest))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_reports_service() {
    let (status, body) = get(router_with(RecordingNotifier::default()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "hotlist-relay");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn index_lists_endpoints() {
    let (status, body) = get(router_with(RecordingNotifier::default()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["GET /api/hotsearch/send/raw"].is_string());
}

#[tokio::test]
async fn hotsearch_returns_outcomes_and_summary_without_sending() {
    let notifier = RecordingNotifier::default();
    let (status, body) = get(router_with(notifier.clone()), "/api/hotsearch").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["success"], 1);
    assert_eq!(body["summary"]["failed"], 1);
    assert_eq!(body["data"][0]["status"], "success");
    assert_eq!(body["data"][0]["items"][0]["rank"], 1);
    assert_eq!(body["data"][1]["status"], "failure");
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn send_uses_summary_and_raw_skips_it() {
    let notifier = RecordingNotifier::default();

    let (status, body) = get(router_with(notifier.clone()), "/api/hotsearch/send").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get(router_with(notifier.clone()), "/api/hotsearch/send/raw").await;
    assert_eq!(status, StatusCode::OK);

    let sent = notifier.messages();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], "summary text");
    assert!(sent[1].starts_with("📊 Trending now - "));
    assert!(sent[1].contains("【Weibo】"));
    assert!(sent[1].ends_with("success: 1, failed: 1"));
}

#[tokio::test]
async fn failed_delivery_is_500() {
    let (status, body) = get(router_with(RecordingNotifier::failing()), "/api/hotsearch/send/raw").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["summary"]["success"], 1);
}

#[tokio::test]
async fn run_reports_delivery() {
    let notifier = RecordingNotifier::default();
    let (status, body) = get(router_with(notifier.clone()), "/api/run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn invalid_source_table_is_500() {
    let t = ScriptedTransport::new();
    let digest = Digest::new(
        vec![weibo::spec(), weibo::spec()],
        t.fetcher(quick_policy(0)),
        Arc::new(MockSummarizer { fixed: None }),
        Arc::new(RecordingNotifier::default()),
    );
    let (status, body) = get(create_router(AppState::new(digest)), "/api/hotsearch").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("duplicate"));
}
