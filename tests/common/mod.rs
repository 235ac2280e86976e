// tests/common/mod.rs
//
// Shared doubles: a scripted HTTP transport keyed by URL and a notifier that
// records what it was asked to send.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use hotlist_relay::ingest::fetcher::{FetchPolicy, HttpGet, HttpResponse, RetryingFetcher};
use hotlist_relay::notify::Notifier;

#[derive(Clone, Debug)]
pub enum Reply {
    Ok(u16, String),
    NetErr(&'static str),
    /// Never answers within any sane timeout.
    Hang,
    /// Answer after a delay.
    Slow(Duration, String),
}

#[derive(Default)]
struct Route {
    script: VecDeque<Reply>,
    /// Served once the script is exhausted.
    fallback: Option<Reply>,
}

#[derive(Default, Clone)]
pub struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<String, Route>>>,
    calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `reply` for `url`.
    pub fn always(self, url: &str, reply: Reply) -> Self {
        self.routes.lock().entry(url.to_string()).or_default().fallback = Some(reply);
        self
    }

    /// Answer `replies` in order, then fall back to the `always` reply.
    pub fn script(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .entry(url.to_string())
            .or_default()
            .script
            .extend(replies);
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|(u, _)| u == url).count()
    }

    pub fn headers_of_first_call(&self, url: &str) -> Vec<(String, String)> {
        self.calls
            .lock()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
            .unwrap_or_default()
    }

    pub fn fetcher(&self, policy: FetchPolicy) -> RetryingFetcher {
        RetryingFetcher::new(Arc::new(self.clone()), policy)
    }
}

#[async_trait]
impl HttpGet for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse> {
        self.calls.lock().push((url.to_string(), headers.to_vec()));
        let reply = {
            let mut routes = self.routes.lock();
            let route = routes
                .get_mut(url)
                .ok_or_else(|| anyhow!("no route for {url}"))?;
            route
                .script
                .pop_front()
                .or_else(|| route.fallback.clone())
                .ok_or_else(|| anyhow!("script exhausted for {url}"))?
        };
        match reply {
            Reply::Ok(status, body) => Ok(HttpResponse { status, body }),
            Reply::NetErr(msg) => Err(anyhow!(msg)),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow!("hang finished"))
            }
            Reply::Slow(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(HttpResponse { status: 200, body })
            }
        }
    }
}

/// Fast policy for tests: short timeout, no delay between attempts.
pub fn quick_policy(max_retries: u32) -> FetchPolicy {
    FetchPolicy {
        timeout: Duration::from_millis(200),
        max_retries,
        retry_delay: Duration::from_millis(0),
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("webhook down"));
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {path}: {e}"))
}
