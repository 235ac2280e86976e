// src/notify/feishu.rs
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::Notifier;
use crate::config::NotifyConfig;

/// Feishu (Lark) custom-bot webhook, plain text messages.
#[derive(Clone)]
pub struct FeishuNotifier {
    webhook_url: Option<String>,
    client: Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    msg_type: &'static str,
    content: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    text: &'a str,
}

impl FeishuNotifier {
    pub fn from_config(cfg: &NotifyConfig) -> Self {
        Self {
            webhook_url: cfg.feishu_webhook.clone(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn new(url: String) -> Self {
        Self {
            webhook_url: Some(url),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

/// The bot answers HTTP 200 even on rejection; the verdict is `code`
/// (older deployments use `StatusCode`).
pub fn check_reply(reply: &Value) -> Result<()> {
    let code = reply
        .get("code")
        .or_else(|| reply.get("StatusCode"))
        .and_then(Value::as_i64);
    match code {
        Some(0) => Ok(()),
        Some(c) => {
            let msg = reply
                .get("msg")
                .or_else(|| reply.get("StatusMessage"))
                .and_then(Value::as_str)
                .unwrap_or("");
            Err(anyhow!("feishu rejected message: code={c} msg={msg}"))
        }
        None => Err(anyhow!("feishu reply without status code: {reply}")),
    }
}

#[async_trait::async_trait]
impl Notifier for FeishuNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            return Err(anyhow!("feishu webhook not configured (FEISHU_WEBHOOK)"));
        };

        let body = TextMessage {
            msg_type: "text",
            content: TextContent { text },
        };

        let reply: Value = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("feishu post")?
            .error_for_status()
            .context("feishu non-2xx")?
            .json()
            .await
            .context("feishu reply is not JSON")?;

        check_reply(&reply)?;
        tracing::info!(chars = text.chars().count(), "feishu message delivered");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "feishu"
    }
}
