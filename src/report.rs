// src/report.rs
//! Plain-text rendering of a [`BatchResult`] for chat delivery.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::ingest::types::{BatchResult, HotItem};

pub const NO_DATA_LINE: &str = "⚠️ No data available";

/// Render the report. Pure in `(batch, now)`; `now` also fixes the elapsed
/// time shown in the trailer.
pub fn format_report(batch: &BatchResult, now: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Trending now - {}", now.format("%Y-%m-%d %H:%M:%S"));
    out.push('\n');

    let mut any = false;
    for outcome in batch.sections() {
        any = true;
        let _ = writeln!(out, "【{}】", outcome.display_name());
        for (i, item) in outcome.items().iter().enumerate() {
            out.push_str(&item_line(i + 1, item));
            out.push('\n');
        }
        out.push('\n');
    }
    if !any {
        out.push_str(NO_DATA_LINE);
        out.push_str("\n\n");
    }

    let _ = writeln!(out, "elapsed: {}ms", batch.elapsed_ms_at(now.with_timezone(&Utc)));
    out.push_str(&summary_line(batch.success_count(), batch.failure_count()));
    out
}

fn item_line(n: usize, item: &HotItem) -> String {
    match item.hot.as_deref() {
        Some(hot) => format!("{n}. {} ({hot})", item.title),
        None => format!("{n}. {}", item.title),
    }
}

pub fn summary_line(success: usize, failed: usize) -> String {
    if failed > 0 {
        format!("success: {success}, failed: {failed}")
    } else {
        format!("success: {success}")
    }
}
