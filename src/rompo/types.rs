//! Wire types for the pre-update password action.
//!
//! The inbound envelope follows the identity server's action contract: the
//! credential under change rides in `event.user.updatingCredential`. A
//! `format` of `HASH` denotes base64 text encoding of the value, not a
//! cryptographic hash; it is decoded before fingerprinting.

use base64ct::{Base64, Encoding};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const FAILURE_PASSWORD_COMPROMISED: &str = "PASSWORD_COMPROMISED";

const CREDENTIAL_TYPE_PASSWORD: &str = "PASSWORD";

#[derive(ToSchema, Deserialize, Debug)]
pub struct PreUpdatePasswordEvent {
    pub event: Event,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub tenant: Option<Tenant>,
    pub user: Option<User>,
    pub user_store: Option<UserStore>,
    pub initiator_type: Option<String>,
    pub action: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct Tenant {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserStore {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<String>,
    pub updating_credential: Option<UpdatingCredential>,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatingCredential {
    #[serde(rename = "type")]
    pub kind: String,

    pub format: CredentialFormat,

    #[schema(value_type = String)]
    pub value: SecretString,
}

#[derive(ToSchema, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialFormat {
    Plain,
    // base64 text encoding, despite the name
    Hash,
}

/// Caller-input problems while locating or decoding the credential
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("event payload carries no password credential")]
    MissingCredential,

    #[error("credential value is not valid base64")]
    MalformedCredential,
}

impl PreUpdatePasswordEvent {
    /// Locate the password under change and decode it to raw bytes
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if the envelope has no password-typed
    /// credential, `MalformedCredential` if a base64-tagged value does not
    /// decode
    pub fn credential(&self) -> Result<SecretSlice<u8>, ExtractError> {
        let credential = self
            .event
            .user
            .as_ref()
            .and_then(|user| user.updating_credential.as_ref())
            .ok_or(ExtractError::MissingCredential)?;

        if credential.kind != CREDENTIAL_TYPE_PASSWORD {
            return Err(ExtractError::MissingCredential);
        }

        match credential.format {
            CredentialFormat::Plain => Ok(SecretSlice::from(
                credential.value.expose_secret().as_bytes().to_vec(),
            )),
            CredentialFormat::Hash => Base64::decode_vec(credential.value.expose_secret())
                .map(SecretSlice::from)
                .map_err(|_| ExtractError::MalformedCredential),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Success,
    Failed,
    Error,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidCredential,
    ServiceError,
}

/// Outcome envelope returned to the identity server
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_status: ActionStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ActionResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            action_status: ActionStatus::Success,
            failure_reason: None,
            failure_description: None,
            error: None,
            error_description: None,
        }
    }

    #[must_use]
    pub fn failed(reason: &str, description: String) -> Self {
        Self {
            action_status: ActionStatus::Failed,
            failure_reason: Some(reason.to_string()),
            failure_description: Some(description),
            error: None,
            error_description: None,
        }
    }

    #[must_use]
    pub fn error(code: ErrorCode, description: String) -> Self {
        Self {
            action_status: ActionStatus::Error,
            failure_reason: None,
            failure_description: None,
            error: Some(code),
            error_description: Some(description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(body: serde_json::Value) -> PreUpdatePasswordEvent {
        serde_json::from_value(body).expect("event payload")
    }

    #[test]
    fn test_credential_plain() {
        let event = event(json!({
            "event": {
                "tenant": { "id": "2210", "name": "testorg" },
                "user": {
                    "id": "8eebb941-51e1-4d13-9d5a-81da9383bc45",
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "PLAIN",
                        "value": "password"
                    }
                },
                "userStore": { "id": "REVGQVVMVA==", "name": "DEFAULT" },
                "initiatorType": "USER",
                "action": "UPDATE"
            }
        }));

        let secret = event.credential().expect("credential");

        assert_eq!(secret.expose_secret(), b"password");
    }

    #[test]
    fn test_credential_base64() {
        let event = event(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "HASH",
                        "value": "cGFzc3dvcmQ="
                    }
                }
            }
        }));

        let secret = event.credential().expect("credential");

        assert_eq!(secret.expose_secret(), b"password");
    }

    #[test]
    fn test_credential_invalid_base64() {
        let event = event(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "HASH",
                        "value": "%%% not base64 %%%"
                    }
                }
            }
        }));

        assert_eq!(
            event.credential().unwrap_err(),
            ExtractError::MalformedCredential
        );
    }

    #[test]
    fn test_credential_missing_user() {
        let event = event(json!({ "event": {} }));

        assert_eq!(
            event.credential().unwrap_err(),
            ExtractError::MissingCredential
        );
    }

    #[test]
    fn test_optional_sections_absent() {
        // tenant, userStore, initiatorType and action may all be omitted
        let event = event(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "PLAIN",
                        "value": "password"
                    }
                }
            }
        }));

        assert!(event.event.tenant.is_none());
        assert!(event.event.user_store.is_none());
        assert!(event.event.initiator_type.is_none());
        assert!(event.event.action.is_none());

        let secret = event.credential().expect("credential");

        assert_eq!(secret.expose_secret(), b"password");
    }

    #[test]
    fn test_credential_missing_updating_credential() {
        let event = event(json!({
            "event": {
                "user": { "id": "8eebb941-51e1-4d13-9d5a-81da9383bc45" }
            }
        }));

        assert_eq!(
            event.credential().unwrap_err(),
            ExtractError::MissingCredential
        );
    }

    #[test]
    fn test_credential_wrong_type() {
        let event = event(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "TOTP",
                        "format": "PLAIN",
                        "value": "123456"
                    }
                }
            }
        }));

        assert_eq!(
            event.credential().unwrap_err(),
            ExtractError::MissingCredential
        );
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let event = event(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "PLAIN",
                        "value": "hunter2"
                    }
                }
            }
        }));

        let debug = format!("{event:?}");

        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_success_serializes_bare() {
        let body = serde_json::to_value(ActionResponse::success()).expect("json");

        assert_eq!(body, json!({ "actionStatus": "SUCCESS" }));
    }

    #[test]
    fn test_failed_serializes_reason_and_description() {
        let response = ActionResponse::failed(
            FAILURE_PASSWORD_COMPROMISED,
            "This password has appeared in 3,730,471 data breaches. Please choose a different password.".to_string(),
        );

        let body = serde_json::to_value(response).expect("json");

        assert_eq!(
            body,
            json!({
                "actionStatus": "FAILED",
                "failureReason": "PASSWORD_COMPROMISED",
                "failureDescription": "This password has appeared in 3,730,471 data breaches. Please choose a different password."
            })
        );
    }

    #[test]
    fn test_error_serializes_code_and_description() {
        let response = ActionResponse::error(
            ErrorCode::ServiceError,
            "breach lookup unavailable".to_string(),
        );

        let body = serde_json::to_value(response).expect("json");

        assert_eq!(
            body,
            json!({
                "actionStatus": "ERROR",
                "error": "service_error",
                "errorDescription": "breach lookup unavailable"
            })
        );
    }

    #[test]
    fn test_error_codes_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorCode::InvalidRequest).expect("json"),
            json!("invalid_request")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::InvalidCredential).expect("json"),
            json!("invalid_credential")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::ServiceError).expect("json"),
            json!("service_error")
        );
    }

    #[test]
    fn test_format_rejects_unknown_values() {
        let result: Result<PreUpdatePasswordEvent, _> = serde_json::from_value(json!({
            "event": {
                "user": {
                    "updatingCredential": {
                        "type": "PASSWORD",
                        "format": "PBKDF2",
                        "value": "irrelevant"
                    }
                }
            }
        }));

        assert!(result.is_err());
    }
}
