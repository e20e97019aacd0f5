//! Range queries against the breach-lookup service and local suffix
//! resolution.

use crate::cli::globals::GlobalArgs;
use crate::hibp::{Error, Fingerprint};
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// One `SUFFIX:COUNT` record from a range response.
///
/// The count stays the raw wire string: it is only interpreted when the
/// suffix actually matches, so junk counts on unrelated records can never
/// fail a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    pub suffix: String,
    pub count: String,
}

/// Outcome of resolving a fingerprint against one range response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    Compromised { occurrences: u64 },
}

/// Shared client for the range endpoint.
///
/// Built once at startup from [`GlobalArgs`]; per-request state does not
/// exist. The underlying `reqwest::Client` is an `Arc` internally, cloning
/// is cheap.
#[derive(Debug, Clone)]
pub struct RangeClient {
    client: Client,
    base_url: String,
}

impl RangeClient {
    /// # Errors
    /// Returns an error if the reqwest client cannot be built.
    pub fn new(globals: &GlobalArgs) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(globals.lookup_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: globals.hibp_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the candidate set for a disclosed prefix.
    ///
    /// Only the 5-character prefix is ever sent; timeouts and transport
    /// failures surface as [`Error::Transport`], HTTP 429 as
    /// [`Error::RateLimited`], any other non-200 as [`Error::Status`]. An
    /// empty body is a valid empty candidate set.
    ///
    /// # Errors
    /// Returns an [`Error`] on transport failure or non-200 status.
    #[instrument(skip(self))]
    pub async fn query(&self, prefix: &str) -> Result<Vec<RangeEntry>, Error> {
        let url = format!("{}/range/{}", self.base_url, prefix);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let entries = parse_range_body(&body);

                debug!("range {} returned {} candidates", prefix, entries.len());

                Ok(entries)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            status => Err(Error::Status(status)),
        }
    }
}

/// Scan a candidate set for the fingerprint's withheld suffix.
///
/// First match wins. The matched count is parsed here and only here; a
/// non-numeric count on the matched record is a data error, not a silent
/// zero. A count of 0 resolves [`Verdict::Clean`] (padding-style records).
///
/// # Errors
/// Returns [`Error::InvalidCount`] if the matched record's count is not a
/// non-negative integer.
pub fn resolve(fingerprint: &Fingerprint, entries: &[RangeEntry]) -> Result<Verdict, Error> {
    for entry in entries {
        if entry.suffix == fingerprint.suffix() {
            let occurrences = entry
                .count
                .parse::<u64>()
                .map_err(|_| Error::InvalidCount(entry.count.clone()))?;

            if occurrences == 0 {
                return Ok(Verdict::Clean);
            }

            return Ok(Verdict::Compromised { occurrences });
        }
    }

    Ok(Verdict::Clean)
}

// 35 hex chars, the tail of a SHA-1 digest after the 5-char prefix
fn valid_suffix(candidate: &str) -> bool {
    Regex::new(r"^[0-9a-fA-F]{35}$").map_or(false, |re| re.is_match(candidate))
}

/// Split a line-oriented `SUFFIX:COUNT` body into candidate records,
/// skipping malformed lines instead of failing the whole lookup.
fn parse_range_body(body: &str) -> Vec<RangeEntry> {
    body.lines()
        .filter_map(|line| {
            let (suffix, count) = line.trim().split_once(':')?;

            if !valid_suffix(suffix) {
                return None;
            }

            Some(RangeEntry {
                suffix: suffix.to_ascii_uppercase(),
                count: count.to_string(),
            })
        })
        .collect()
}
