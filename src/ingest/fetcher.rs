// src/ingest/fetcher.rs
//! HTTP GET with a per-attempt timeout, rotating browser user agents, and a
//! fixed-delay retry budget.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use rand::seq::IndexedRandom;

use crate::error::FetchError;

/// Browser identities rotated per attempt to get past trivial bot filters.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0",
];

const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";
const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP client seam; tests plug in scripted transports.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse>;
}

/// Production transport.
///
/// Certificate validation is switched off: the upstreams are consumer sites
/// and nothing here depends on their chains being valid.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("building upstream http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpGet for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse> {
        let mut req = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }
        let resp = req.send().await.with_context(|| format!("GET {url}"))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.context("reading response body")?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_retries: 3,
            retry_delay: Duration::from_millis(1_000),
        }
    }
}

#[derive(Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn HttpGet>,
    policy: FetchPolicy,
}

impl RetryingFetcher {
    pub fn new(transport: Arc<dyn HttpGet>, policy: FetchPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// GET `url` and return the body of the first 2xx response.
    ///
    /// Makes at most `1 + max_retries` attempts, sleeping `retry_delay`
    /// between them. The error carries the cause of the last attempt.
    pub async fn fetch(&self, url: &str, extra_headers: &[(&str, &str)]) -> Result<String, FetchError> {
        let total = self.policy.max_retries.saturating_add(1);
        let mut last_cause = String::new();

        for attempt in 1..=total {
            let headers = request_headers(random_user_agent(), extra_headers);
            counter!("hotlist_fetch_attempts_total").increment(1);

            let call = self.transport.get(url, &headers, self.policy.timeout);
            match tokio::time::timeout(self.policy.timeout, call).await {
                Ok(Ok(resp)) if (200..300).contains(&resp.status) => return Ok(resp.body),
                Ok(Ok(resp)) => last_cause = format!("HTTP status {}", resp.status),
                Ok(Err(e)) => last_cause = format!("{e:#}"),
                Err(_) => {
                    last_cause = format!("timed out after {}ms", self.policy.timeout.as_millis())
                }
            }

            if attempt < total {
                tracing::warn!(
                    url,
                    attempt,
                    of = total,
                    delay_ms = self.policy.retry_delay.as_millis() as u64,
                    error = %last_cause,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        Err(FetchError::Network {
            url: url.to_string(),
            attempts: total,
            cause: last_cause,
        })
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Default headers plus per-source ones; a source header replaces a default
/// of the same name.
pub fn request_headers(user_agent: &str, extra: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = vec![
        ("User-Agent".into(), user_agent.into()),
        ("Accept".into(), DEFAULT_ACCEPT.into()),
        ("Accept-Language".into(), DEFAULT_ACCEPT_LANGUAGE.into()),
    ];
    for (name, value) in extra {
        match out.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = (*value).to_string(),
            None => out.push(((*name).to_string(), (*value).to_string())),
        }
    }
    out
}
