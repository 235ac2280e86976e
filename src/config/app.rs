// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ai::AiConfig;
use crate::ingest::fetcher::FetchPolicy;

pub const ENV_CONFIG_PATH: &str = "HOTLIST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/hotlist.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub sources: SourcesConfig,
    pub notify: NotifyConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub retry_times: u32,
    pub retry_delay_ms: u64,
}

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_times: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl FetchConfig {
    /// A zero timeout means "unset" and falls back to the default.
    pub fn policy(&self) -> FetchPolicy {
        let timeout_ms = match self.timeout_ms {
            0 => DEFAULT_TIMEOUT_MS,
            ms => ms,
        };
        FetchPolicy {
            timeout: Duration::from_millis(timeout_ms),
            max_retries: self.retry_times,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourcesConfig {
    /// Source keys to skip, e.g. `["douban"]`.
    pub disabled: Vec<String>,
}

impl SourcesConfig {
    pub fn is_enabled(&self, key: &str) -> bool {
        !self.disabled.iter().any(|d| d.trim().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    pub feishu_webhook: Option<String>,
}

impl AppConfig {
    /// Load configuration:
    /// 1) built-in defaults
    /// 2) $HOTLIST_CONFIG_PATH, else config/hotlist.toml when present
    /// 3) environment overrides (FEISHU_WEBHOOK, TIMEOUT, RETRY_TIMES, ...)
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::from_file(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Apply variable overrides from `lookup` and resolve the AI key.
    /// Unparsable numbers keep the current value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FEISHU_WEBHOOK").filter(|s| !s.trim().is_empty()) {
            self.notify.feishu_webhook = Some(url.trim().to_string());
        }

        let mut timeout_ms = self.fetch.timeout_ms;
        override_num(&lookup, "TIMEOUT", &mut timeout_ms);
        if timeout_ms > 0 {
            self.fetch.timeout_ms = timeout_ms;
        } else {
            tracing::warn!(var = "TIMEOUT", "ignoring zero timeout");
        }
        override_num(&lookup, "RETRY_TIMES", &mut self.fetch.retry_times);
        override_num(&lookup, "RETRY_DELAY", &mut self.fetch.retry_delay_ms);

        if let Some(list) = lookup("SOURCES_DISABLED") {
            self.sources.disabled = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(v) = lookup("AI_ENABLED") {
            self.ai.enabled = !v.trim().eq_ignore_ascii_case("false");
        }
        if let Some(v) = lookup("AI_MODEL_NAME") {
            self.ai.model_name = v;
        }
        if let Some(v) = lookup("AI_BASE_URL") {
            self.ai.base_url = v;
        }
        override_num(&lookup, "AI_MAX_TOKENS", &mut self.ai.max_tokens);
        override_num(&lookup, "AI_TEMPERATURE", &mut self.ai.temperature);

        self.ai.finalize(&lookup);
    }
}

fn override_num<F, T>(lookup: &F, name: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(name) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => *slot = v,
        Err(_) => tracing::warn!(var = name, value = %raw, "ignoring unparsable override"),
    }
}
