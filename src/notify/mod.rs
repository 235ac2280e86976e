// src/notify/mod.rs
pub mod feishu;

use anyhow::Result;

pub use feishu::FeishuNotifier;

/// Delivery channel for a finished report.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;

    fn name(&self) -> &'static str;
}
