// src/api.rs
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::digest::{DeliveryMode, Digest};
use crate::error::SourceSpecError;
use crate::ingest::types::{BatchResult, FetchOutcome};

pub const SERVICE_NAME: &str = "hotlist-relay";

#[derive(Clone)]
pub struct AppState {
    pub digest: Arc<Digest>,
}

impl AppState {
    pub fn new(digest: Digest) -> Self {
        Self {
            digest: Arc::new(digest),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/hotsearch", get(hotsearch))
        .route("/api/hotsearch/send", get(send_summarized))
        .route("/api/hotsearch/send/raw", get(send_raw))
        .route("/api/run", get(run))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub duration_ms: i64,
}

impl Summary {
    fn of(batch: &BatchResult) -> Self {
        Self {
            total: batch.outcomes.len(),
            success: batch.success_count(),
            failed: batch.failure_count(),
            duration_ms: batch.elapsed_ms_at(batch.finished_at),
        }
    }
}

#[derive(Serialize)]
struct BatchResp<'a> {
    success: bool,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: &'a [FetchOutcome],
    summary: Summary,
}

async fn index() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /health": "health check",
            "GET /api/hotsearch": "fetch trending lists (no delivery)",
            "GET /api/hotsearch/send": "fetch and deliver, summarized when AI is enabled",
            "GET /api/hotsearch/send/raw": "fetch and deliver the raw report",
            "GET /api/run": "full run (fetch and deliver)"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": now_iso(),
        "service": SERVICE_NAME,
    }))
}

async fn hotsearch(State(state): State<AppState>) -> Response {
    match state.digest.collect().await {
        Ok(batch) => Json(BatchResp {
            success: true,
            timestamp: now_iso(),
            message: None,
            data: &batch.outcomes,
            summary: Summary::of(&batch),
        })
        .into_response(),
        Err(e) => spec_error(e),
    }
}

async fn send_summarized(State(state): State<AppState>) -> Response {
    send_with(&state, DeliveryMode::Summarized).await
}

async fn send_raw(State(state): State<AppState>) -> Response {
    send_with(&state, DeliveryMode::Raw).await
}

async fn send_with(state: &AppState, mode: DeliveryMode) -> Response {
    let report = match state.digest.run(mode).await {
        Ok(r) => r,
        Err(e) => return spec_error(e),
    };
    let status = if report.delivered {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let message = if report.delivered {
        "report delivered"
    } else {
        "report fetched but delivery failed"
    };
    let body = BatchResp {
        success: report.delivered,
        timestamp: now_iso(),
        message: Some(message),
        data: &report.batch.outcomes,
        summary: Summary::of(&report.batch),
    };
    (status, Json(body)).into_response()
}

async fn run(State(state): State<AppState>) -> Response {
    match state.digest.run(DeliveryMode::Summarized).await {
        Ok(report) => {
            let message = if report.delivered {
                "run finished, report delivered"
            } else {
                "run finished, delivery failed"
            };
            Json(json!({
                "success": report.delivered,
                "message": message,
                "timestamp": now_iso(),
            }))
            .into_response()
        }
        Err(e) => spec_error(e),
    }
}

fn spec_error(e: SourceSpecError) -> Response {
    tracing::error!(error = %e, "invalid source table");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": e.to_string(),
            "timestamp": now_iso(),
        })),
    )
        .into_response()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}
