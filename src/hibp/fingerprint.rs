//! Credential fingerprint: SHA-1 digest split into the disclosed prefix and
//! the withheld suffix.

use sha1::{Digest, Sha1};
use std::fmt;

/// Number of leading hex characters disclosed to the range endpoint.
pub const PREFIX_LEN: usize = 5;

/// Hex length of a full SHA-1 digest.
pub const DIGEST_LEN: usize = 40;

/// Uppercase hex SHA-1 digest of a candidate secret.
///
/// The range protocol is keyed by this exact digest scheme: no salt, no
/// randomness, same input always yields the same split. Only `prefix()` may
/// leave the process; `suffix()` is compared locally against the candidate
/// set returned by the lookup service.
#[derive(Clone, PartialEq, Eq)]
pub struct Fingerprint {
    digest: String,
}

impl Fingerprint {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let digest = base16ct::upper::encode_string(&Sha1::digest(secret));

        Self { digest }
    }

    /// First 5 hex characters, safe to disclose (1-in-16^5 equivalence class).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.digest[..PREFIX_LEN]
    }

    /// Remaining 35 hex characters, never transmitted.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.digest[PREFIX_LEN..]
    }
}

// The suffix narrows the secret far beyond the disclosed equivalence class,
// keep it out of Debug output and spans.
impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("prefix", &self.prefix())
            .field("suffix", &"[REDACTED]")
            .finish()
    }
}
