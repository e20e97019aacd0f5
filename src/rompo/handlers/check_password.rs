//! Pre-update password action handler.
//!
//! Pipeline per request: extract the credential from the event envelope,
//! fingerprint it, query the range endpoint with the disclosed prefix,
//! resolve the withheld suffix locally, then map the verdict through the
//! configured breach policy. Exactly one outbound call, no state between
//! requests.

use crate::{
    cli::globals::{BreachPolicy, GlobalArgs},
    hibp::{self, resolve, Fingerprint, RangeClient, RangeEntry, Verdict},
    rompo::types::{
        ActionResponse, ErrorCode, ExtractError, PreUpdatePasswordEvent,
        FAILURE_PASSWORD_COMPROMISED,
    },
};
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json, Extension};
use secrecy::ExposeSecret;
use std::{future::Future, pin::Pin};
use tracing::{debug, error, instrument, warn};

/// Seam over [`RangeClient`] so the decision pipeline can be driven with
/// canned range responses.
pub(crate) trait RangeLookup {
    fn lookup<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RangeEntry>, hibp::Error>> + Send + 'a>>;
}

impl RangeLookup for RangeClient {
    fn lookup<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RangeEntry>, hibp::Error>> + Send + 'a>> {
        Box::pin(self.query(prefix))
    }
}

#[utoipa::path(
    post,
    path = "/check-password",
    request_body = PreUpdatePasswordEvent,
    responses (
        (status = 200, description = "Credential allowed or denied", body = ActionResponse),
        (status = 400, description = "Malformed event payload or credential", body = ActionResponse),
        (status = 502, description = "Breach lookup failed and policy is fail-closed", body = ActionResponse)
    ),
    tag = "rompo",
)]
#[instrument(skip(globals, client, payload))]
pub async fn check_password(
    globals: Extension<GlobalArgs>,
    client: Extension<RangeClient>,
    payload: Result<Json<PreUpdatePasswordEvent>, JsonRejection>,
) -> (StatusCode, Json<ActionResponse>) {
    let Json(event) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejecting action payload: {}", rejection);

            return (
                StatusCode::BAD_REQUEST,
                Json(ActionResponse::error(
                    ErrorCode::InvalidRequest,
                    "Request body is not a valid pre-update password event".to_string(),
                )),
            );
        }
    };

    gate(&event, &client.0, globals.policy).await
}

/// Run the breach check for one event and map the outcome through the
/// policy. The raw secret never leaves this function.
async fn gate<L: RangeLookup>(
    event: &PreUpdatePasswordEvent,
    lookup: &L,
    policy: BreachPolicy,
) -> (StatusCode, Json<ActionResponse>) {
    let secret = match event.credential() {
        Ok(secret) => secret,
        Err(err) => return reject_credential(&err),
    };

    let fingerprint = Fingerprint::new(secret.expose_secret());
    drop(secret);

    let outcome = match lookup.lookup(fingerprint.prefix()).await {
        Ok(entries) => resolve(&fingerprint, &entries),
        Err(err) => Err(err),
    };

    decide(policy, outcome)
}

fn reject_credential(err: &ExtractError) -> (StatusCode, Json<ActionResponse>) {
    warn!("Rejecting credential: {}", err);

    (
        StatusCode::BAD_REQUEST,
        Json(ActionResponse::error(
            ErrorCode::InvalidCredential,
            err.to_string(),
        )),
    )
}

/// Map a verdict or lookup failure to the action response.
///
/// Lookup failures follow the configured policy: fail-open allows the
/// credential and logs, fail-closed reports `service_error` with 502. Rate
/// limiting keeps its own retry-hinting description either way.
fn decide(
    policy: BreachPolicy,
    outcome: Result<Verdict, hibp::Error>,
) -> (StatusCode, Json<ActionResponse>) {
    match outcome {
        Ok(Verdict::Clean) => {
            debug!("Credential not found in breach corpus");

            (StatusCode::OK, Json(ActionResponse::success()))
        }
        Ok(Verdict::Compromised { occurrences }) => {
            debug!("Credential found in breach corpus");

            (
                StatusCode::OK,
                Json(ActionResponse::failed(
                    FAILURE_PASSWORD_COMPROMISED,
                    format!(
                        "This password has appeared in {} data breaches. Please choose a different password.",
                        format_count(occurrences)
                    ),
                )),
            )
        }
        Err(err) => match policy {
            BreachPolicy::FailOpen => {
                warn!("Allowing credential, breach lookup failed: {}", err);

                (StatusCode::OK, Json(ActionResponse::success()))
            }
            BreachPolicy::FailClosed => {
                error!("Rejecting credential, breach lookup failed: {}", err);

                let description = if matches!(err, hibp::Error::RateLimited) {
                    "The breach lookup service is rate limiting requests, retry shortly".to_string()
                } else {
                    "Unable to verify the password against breach data".to_string()
                };

                (
                    StatusCode::BAD_GATEWAY,
                    Json(ActionResponse::error(ErrorCode::ServiceError, description)),
                )
            }
        },
    }
}

// 3730471 -> "3,730,471"
fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }

        formatted.push(c);
    }

    formatted
}
