// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod digest;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod summarize;

pub use crate::api::create_router;
pub use crate::digest::{DeliveryMode, Digest, RunReport};
pub use crate::ingest::run_batch;
pub use crate::report::format_report;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "hotlist_relay=info,warn";

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// filter; `LOG_FORMAT=json` switches to JSON lines. A second call is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}
