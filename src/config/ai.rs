// src/config/ai.rs
use serde::{Deserialize, Serialize};

pub const ENV_AI_API_KEY: &str = "AI_API_KEY";

fn default_enabled() -> bool {
    true
}
fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}
fn default_model_name() -> String {
    "qwen-vl-max-latest".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_temperature() -> f32 {
    0.7
}

/// Settings of the OpenAI-compatible summarization endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base URL up to (not including) `/chat/completions`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// "ENV" means: read from `AI_API_KEY`.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model_name: default_model_name(),
            api_key: default_api_key(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl AiConfig {
    /// Resolve the "ENV" placeholder and clamp numeric knobs.
    ///
    /// A missing key is not an error: the summarizer then stays disabled and
    /// reports pass through unchanged.
    pub fn finalize<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = lookup(ENV_AI_API_KEY).unwrap_or_default();
        }
        self.api_key = self.api_key.trim().to_string();

        if !(0.0..=2.0).contains(&self.temperature) {
            self.temperature = default_temperature();
        }
        if self.max_tokens == 0 {
            self.max_tokens = default_max_tokens();
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty() && !self.base_url.is_empty()
    }
}
