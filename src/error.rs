// src/error.rs
//! Typed errors of the fetch/parse/aggregate core.
//!
//! Only [`SourceSpecError`] ever leaves [`crate::ingest::run_batch`]; the other
//! two are absorbed at the per-source boundary and end up as
//! `FetchOutcome::Failure` messages.

/// A source could not be fetched after all attempts.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error for {url} after {attempts} attempt(s): {cause}")]
    Network {
        url: String,
        attempts: u32,
        cause: String,
    },
}

/// The fetched document could not be decoded at all.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{source_key}: response is not valid JSON: {reason}")]
    Malformed { source_key: String, reason: String },

    #[error("{source_key}: invalid fragment pattern: {reason}")]
    Pattern { source_key: String, reason: String },
}

/// Invalid source table; a configuration bug rather than a runtime condition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SourceSpecError {
    #[error("source with empty key")]
    EmptyKey,

    #[error("duplicate source key: {0}")]
    DuplicateKey(String),

    #[error("source {0} has no endpoint")]
    MissingEndpoint(String),

    #[error("source {0} keeps zero items")]
    ZeroMaxItems(String),

    #[error("source {key} has an invalid fragment pattern: {reason}")]
    InvalidPattern { key: String, reason: String },
}
