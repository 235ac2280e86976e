// src/digest.rs
//! End-to-end run: collect → format → (summarize) → deliver.

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use crate::config::AppConfig;
use crate::error::SourceSpecError;
use crate::ingest::fetcher::{HttpGet, ReqwestTransport, RetryingFetcher};
use crate::ingest::providers::configured_sources;
use crate::ingest::run_batch;
use crate::ingest::types::{BatchResult, SourceSpec};
use crate::notify::{FeishuNotifier, Notifier};
use crate::report::format_report;
use crate::summarize::{build_summarizer, summarize_or_original, DynSummarizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Summarized,
    Raw,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub batch: BatchResult,
    pub text: String,
    pub delivered: bool,
}

pub struct Digest {
    sources: Vec<SourceSpec>,
    fetcher: RetryingFetcher,
    summarizer: DynSummarizer,
    notifier: Arc<dyn Notifier>,
}

impl Digest {
    pub fn new(
        sources: Vec<SourceSpec>,
        fetcher: RetryingFetcher,
        summarizer: DynSummarizer,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            sources,
            fetcher,
            summarizer,
            notifier,
        }
    }

    /// Production wiring: reqwest transport, configured sources, Feishu.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let transport: Arc<dyn HttpGet> = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(
            configured_sources(&cfg.sources),
            RetryingFetcher::new(transport, cfg.fetch.policy()),
            build_summarizer(&cfg.ai),
            Arc::new(FeishuNotifier::from_config(&cfg.notify)),
        ))
    }

    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    pub async fn collect(&self) -> Result<BatchResult, SourceSpecError> {
        run_batch(&self.sources, &self.fetcher).await
    }

    pub async fn compose(&self, batch: &BatchResult, mode: DeliveryMode) -> String {
        let report = format_report(batch, Local::now());
        match mode {
            DeliveryMode::Raw => report,
            DeliveryMode::Summarized => summarize_or_original(self.summarizer.as_ref(), &report).await,
        }
    }

    /// Send `text`; failures are logged and reported as `false`.
    pub async fn deliver(&self, text: &str) -> bool {
        match self.notifier.send(text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(notifier = self.notifier.name(), error = ?e, "delivery failed");
                false
            }
        }
    }

    pub async fn run(&self, mode: DeliveryMode) -> Result<RunReport, SourceSpecError> {
        let batch = self.collect().await?;
        let text = self.compose(&batch, mode).await;
        let delivered = self.deliver(&text).await;
        Ok(RunReport {
            batch,
            text,
            delivered,
        })
    }
}
