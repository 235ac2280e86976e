// src/ingest/mod.rs
pub mod fetcher;
pub mod parse;
pub mod providers;
pub mod types;

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;

use crate::error::SourceSpecError;
use crate::ingest::fetcher::RetryingFetcher;
use crate::ingest::types::{BatchResult, FetchOutcome, SourceSpec};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "hotlist_fetch_attempts_total",
            "HTTP attempts made against upstream sources, retries included."
        );
        describe_counter!(
            "hotlist_source_failures_total",
            "Sources that ended a batch as failures."
        );
        describe_counter!("hotlist_items_total", "Items parsed from successful sources.");
        describe_histogram!("hotlist_batch_ms", "Wall time of one batch in milliseconds.");
        describe_gauge!("hotlist_last_run_ts", "Unix ts when the last batch finished.");
    });
}

/// Reject a source table that can never work. Runs before any I/O.
pub fn validate_sources(sources: &[SourceSpec]) -> Result<(), SourceSpecError> {
    let mut seen = HashSet::new();
    for s in sources {
        if s.key.trim().is_empty() {
            return Err(SourceSpecError::EmptyKey);
        }
        if !seen.insert(s.key) {
            return Err(SourceSpecError::DuplicateKey(s.key.to_string()));
        }
        if s.endpoint.trim().is_empty() {
            return Err(SourceSpecError::MissingEndpoint(s.key.to_string()));
        }
        if s.parse.max_items() == 0 {
            return Err(SourceSpecError::ZeroMaxItems(s.key.to_string()));
        }
        s.parse
            .check()
            .map_err(|reason| SourceSpecError::InvalidPattern {
                key: s.key.to_string(),
                reason,
            })?;
    }
    Ok(())
}

/// Fetch and parse every enabled source concurrently.
///
/// Every source settles on its own: a failing source becomes a
/// `FetchOutcome::Failure` and never aborts the others. Outcomes keep the
/// declaration order of `sources`.
pub async fn run_batch(
    sources: &[SourceSpec],
    fetcher: &RetryingFetcher,
) -> Result<BatchResult, SourceSpecError> {
    ensure_metrics_described();
    validate_sources(sources)?;

    let started_at = Utc::now();
    let t0 = Instant::now();

    let outcomes = join_all(
        sources
            .iter()
            .filter(|s| s.enabled)
            .map(|s| fetch_one(s, fetcher)),
    )
    .await;

    let finished_at = Utc::now();
    let batch = BatchResult {
        outcomes,
        started_at,
        finished_at,
    };

    let items: usize = batch.outcomes.iter().map(|o| o.items().len()).sum();
    counter!("hotlist_source_failures_total").increment(batch.failure_count() as u64);
    counter!("hotlist_items_total").increment(items as u64);
    histogram!("hotlist_batch_ms").record(t0.elapsed().as_secs_f64() * 1000.0);
    gauge!("hotlist_last_run_ts").set(finished_at.timestamp() as f64);

    tracing::info!(
        sources = batch.outcomes.len(),
        success = batch.success_count(),
        failed = batch.failure_count(),
        items,
        elapsed_ms = batch.elapsed_ms_at(finished_at),
        "batch finished"
    );

    Ok(batch)
}

async fn fetch_one(spec: &SourceSpec, fetcher: &RetryingFetcher) -> FetchOutcome {
    let result = match fetcher.fetch(&spec.endpoint, &spec.request_headers).await {
        Ok(body) => spec.parse_body(&body).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match result {
        Ok(items) => {
            if items.is_empty() {
                tracing::warn!(source = spec.key, "no items parsed");
            } else {
                tracing::debug!(source = spec.key, items = items.len(), "source ok");
            }
            FetchOutcome::Success {
                source_key: spec.key.to_string(),
                display_name: spec.display_name.to_string(),
                items,
                fetched_at: Utc::now(),
            }
        }
        Err(error) => {
            tracing::warn!(source = spec.key, error = %error, "source failed");
            FetchOutcome::Failure {
                source_key: spec.key.to_string(),
                display_name: spec.display_name.to_string(),
                error,
                fetched_at: Utc::now(),
            }
        }
    }
}
