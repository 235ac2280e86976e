//! Optional LLM pass over the report (OpenAI-compatible chat completions).
//!
//! Every failure path yields `None`; callers fall back to the raw report via
//! [`summarize_or_original`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;

const PROMPT_HEADER: &str = "Tidy up and summarize the trending-topics report below. Requirements:
1. Keep the per-platform section structure.
2. Add a brief analysis and summary for each platform.
3. Highlight the most important and most interesting topics.
4. Keep the language concise and easy to read in a group chat.
5. Keep the original timestamp and statistics lines.

Report:
";

pub trait Summarizer: Send + Sync {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    fn name(&self) -> &'static str;
}

pub type DynSummarizer = Arc<dyn Summarizer>;

/// Run `summarizer` and keep `original` when it yields nothing usable.
pub async fn summarize_or_original(summarizer: &dyn Summarizer, original: &str) -> String {
    match summarizer.summarize(original).await {
        Some(s) if !s.trim().is_empty() => {
            tracing::info!(provider = summarizer.name(), "report summarized");
            s
        }
        _ => {
            tracing::debug!(provider = summarizer.name(), "summary unavailable, using raw report");
            original.to_string()
        }
    }
}

/// Disabled summarizer unless the config carries everything a call needs.
pub fn build_summarizer(cfg: &AiConfig) -> DynSummarizer {
    if !cfg.is_usable() {
        tracing::info!(enabled = cfg.enabled, "ai summarization off");
        return Arc::new(DisabledSummarizer);
    }
    match OpenAiCompatSummarizer::new(cfg) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::warn!(error = ?e, "ai client init failed, summarization off");
            Arc::new(DisabledSummarizer)
        }
    }
}

pub fn build_prompt(report: &str) -> String {
    format!("{PROMPT_HEADER}{report}")
}

pub struct OpenAiCompatSummarizer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatSummarizer {
    pub fn new(cfg: &AiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hotlist-relay/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(60))
            .build()
            .context("building ai http client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key: cfg.api_key.clone(),
            model: cfg.model_name.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

impl Summarizer for OpenAiCompatSummarizer {
    fn summarize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return None;
            }
            let prompt = build_prompt(text);
            let req = Req {
                model: &self.model,
                messages: vec![Msg {
                    role: "user",
                    content: &prompt,
                }],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let resp = match self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "ai request failed");
                    return None;
                }
            };
            if !resp.status().is_success() {
                tracing::warn!(status = resp.status().as_u16(), "ai request rejected");
                return None;
            }
            let body: Resp = resp.json().await.ok()?;
            let content = body.choices.into_iter().next()?.message.content?;
            let content = content.trim();
            (!content.is_empty()).then(|| content.to_string())
        })
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}

/// Returns `None` always; used when AI is disabled.
pub struct DisabledSummarizer;

impl Summarizer for DisabledSummarizer {
    fn summarize<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed answer for tests and local runs; `None` simulates a failing provider.
#[derive(Clone)]
pub struct MockSummarizer {
    pub fixed: Option<String>,
}

impl Summarizer for MockSummarizer {
    fn summarize<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { out })
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}
