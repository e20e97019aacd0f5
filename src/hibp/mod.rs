//! Client for the breach-corpus range API (HaveIBeenPwned protocol).
//!
//! Exposes the three protocol steps: fingerprint a secret, query the range
//! endpoint with the disclosed prefix, and resolve the withheld suffix
//! against the returned candidate set. The caller decides what a lookup
//! failure means (fail-open vs fail-closed); this module only reports it.

pub mod fingerprint;
pub mod range;

pub use self::fingerprint::Fingerprint;
pub use self::range::{resolve, RangeClient, RangeEntry, Verdict};

use thiserror::Error;

/// Lookup failures, distinguished so the decision policy can map them.
///
/// A clean "suffix not found in this range" is not an error; it comes back
/// as an empty or non-matching candidate set.
#[derive(Debug, Error)]
pub enum Error {
    #[error("breach lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("breach lookup service is rate limiting us, retry later")]
    RateLimited,
    #[error("breach lookup returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("matched breach record has a non-numeric count: {0:?}")]
    InvalidCount(String),
}
