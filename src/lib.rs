//! # Rompo (Password Breach Gate)
//!
//! `rompo` is a small HTTP service invoked as a pre-update-password action:
//! given the credential a user is about to set, it answers whether that
//! password is known from public breach corpora and returns an
//! allow/deny/error decision to the identity server driving the flow.
//!
//! ## k-anonymity
//!
//! Passwords are never sent anywhere. The candidate secret is hashed with
//! SHA-1 and only the first 5 hex characters of the digest are disclosed to
//! the breach-lookup service (`/range/{prefix}`); the remaining 35
//! characters stay in process memory and are compared locally against the
//! returned candidate set. The lookup service learns a 1-in-16^5
//! equivalence class, nothing more.
//!
//! ## Fail-open vs fail-closed
//!
//! When the lookup service is unreachable, rate limited, or answers
//! garbage, the gate applies a single configured policy: `fail-open`
//! (allow the password change, log the failure) or `fail-closed` (report
//! `service_error` to the caller). The policy is explicit configuration,
//! never an accident of which code path runs first.

pub mod cli;
pub mod hibp;
pub mod rompo;
