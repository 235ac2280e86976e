// src/ingest/types.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ParseError;
use crate::ingest::parse::ParseStrategy;

/// One entry of a platform's trending list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HotItem {
    pub title: String,
    /// Platform-specific unit (view count, heat score, ...), shown as-is.
    pub hot: Option<String>,
    /// 1-based.
    pub rank: u32,
}

/// Declarative fetch + parse description of one platform.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub key: &'static str,
    pub display_name: &'static str,
    pub endpoint: String,
    pub request_headers: Vec<(&'static str, &'static str)>,
    pub enabled: bool,
    pub parse: ParseStrategy,
}

impl SourceSpec {
    pub fn parse_body(&self, body: &str) -> Result<Vec<HotItem>, ParseError> {
        self.parse.apply(self.key, body)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Per-source result of one batch run.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success {
        source_key: String,
        display_name: String,
        items: Vec<HotItem>,
        fetched_at: DateTime<Utc>,
    },
    Failure {
        source_key: String,
        display_name: String,
        error: String,
        fetched_at: DateTime<Utc>,
    },
}

impl FetchOutcome {
    pub fn source_key(&self) -> &str {
        match self {
            FetchOutcome::Success { source_key, .. } | FetchOutcome::Failure { source_key, .. } => {
                source_key
            }
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            FetchOutcome::Success { display_name, .. }
            | FetchOutcome::Failure { display_name, .. } => display_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Items of a successful outcome; failures have none.
    pub fn items(&self) -> &[HotItem] {
        match self {
            FetchOutcome::Success { items, .. } => items,
            FetchOutcome::Failure { .. } => &[],
        }
    }
}

/// All outcomes of one run, in source declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub outcomes: Vec<FetchOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchResult {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Successful outcomes that actually carry items.
    pub fn sections(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success() && !o.items().is_empty())
    }

    pub fn elapsed_ms_at(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0)
    }
}
