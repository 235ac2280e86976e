//! One-shot run: fetch every source, print the report, deliver it.
//!
//! ```text
//! run_once            # summarize (if AI is configured) and send to Feishu
//! run_once --raw      # send the raw report
//! run_once --dry-run  # print only
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use hotlist_relay::config::AppConfig;
use hotlist_relay::{DeliveryMode, Digest};

#[derive(Debug, Parser)]
#[command(name = "run_once", version, about = "Fetch trending lists once and relay the digest")]
struct Cli {
    /// Skip AI summarization.
    #[arg(long)]
    raw: bool,

    /// Print the report without delivering it.
    #[arg(long)]
    dry_run: bool,

    /// Override the Feishu webhook for this run.
    #[arg(long, env = "FEISHU_WEBHOOK")]
    webhook: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    hotlist_relay::init_tracing();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let mut cfg = AppConfig::load().context("loading configuration")?;
    if let Some(url) = cli.webhook.filter(|u| !u.trim().is_empty()) {
        cfg.notify.feishu_webhook = Some(url);
    }

    let digest = Digest::from_config(&cfg)?;
    let mode = if cli.raw {
        DeliveryMode::Raw
    } else {
        DeliveryMode::Summarized
    };

    let batch = digest.collect().await?;
    let text = digest.compose(&batch, mode).await;
    println!("{text}");

    if cli.dry_run {
        return Ok(true);
    }
    Ok(digest.deliver(&text).await)
}
