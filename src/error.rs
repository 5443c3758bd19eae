// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types surfaced by the gateway, the auth client and the typed API.
//!
//! Only HTTP-status-derived failures are normalized into [`ApiError`].
//! Transport failures keep the underlying `reqwest` error untouched.

use serde::Serialize;
use serde_json::Value;

use crate::session::StoreError;

/// Body fields consulted (in order) when the gateway builds an error message.
pub const GATEWAY_MESSAGE_KEYS: [&str; 3] = ["error", "message", "title"];

/// Body fields consulted (in order) by the login and refresh calls.
pub const AUTH_MESSAGE_KEYS: [&str; 3] = ["message", "error", "title"];

/// Normalized failure returned by the AWIS backend or raised before a call.
///
/// `status` is `0` for client-side conditions (base URL not configured, token
/// missing in an auth response).
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// Raised before any network call when no base URL can be resolved.
    pub fn base_url_missing() -> Self {
        Self::new(0, "Base URL not configured")
    }

    /// Build the error for a non-2xx response.
    ///
    /// The message comes from the first non-empty field of `keys` in the
    /// parsed body, falling back to `HTTP error {status}`.
    pub fn from_response(status: u16, body: Option<Value>, keys: &[&str]) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| message_from_body(b, keys))
            .unwrap_or_else(|| format!("HTTP error {status}"));

        Self {
            status,
            message,
            details: body,
        }
    }

    /// Whether the failure happened client-side, before or after the wire.
    pub fn is_client_side(&self) -> bool {
        self.status == 0
    }

    /// Human readable message for presenting to an operator.
    ///
    /// Uses the backend message when it carries one, otherwise a status based
    /// hint.
    pub fn user_message(&self) -> String {
        let generic = self.message.starts_with("HTTP error ");
        if !self.message.trim().is_empty() && !generic {
            return self.message.clone();
        }

        match self.status {
            409 => "Data conflict. Check clientId, tenant id (X-Progem-ID) and domain.".to_string(),
            400 => "Invalid data. Check the fields and try again.".to_string(),
            401 => "Not authenticated. Log in again.".to_string(),
            403 => "You do not have permission for this action.".to_string(),
            _ => self.message.clone(),
        }
    }
}

/// Extract a message from a JSON error body.
pub(crate) fn message_from_body(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match body.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Top-level error for gateway and typed API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Normalized HTTP or configuration failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network-level failure, propagated as-is.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Session persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// The normalized API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status for API errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|e| e.status)
    }

    /// Message suitable for an operator.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_response_prefers_error_field_for_gateway() {
        let body = json!({ "message": "second", "error": "first" });
        let err = ApiError::from_response(422, Some(body.clone()), &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.status, 422);
        assert_eq!(err.message, "first");
        assert_eq!(err.details, Some(body));
    }

    #[test]
    fn from_response_prefers_message_field_for_auth() {
        let body = json!({ "message": "token expired", "error": "bad_request" });
        let err = ApiError::from_response(400, Some(body), &AUTH_MESSAGE_KEYS);
        assert_eq!(err.message, "token expired");
    }

    #[test]
    fn from_response_falls_back_to_generic_message() {
        let err = ApiError::from_response(502, None, &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.message, "HTTP error 502");
        assert!(err.details.is_none());

        let err = ApiError::from_response(500, Some(json!({ "raw": "boom" })), &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.message, "HTTP error 500");
    }

    #[test]
    fn empty_message_fields_are_skipped() {
        let body = json!({ "error": "", "title": "Conflict" });
        let err = ApiError::from_response(409, Some(body), &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.message, "Conflict");
    }

    #[test]
    fn user_message_uses_status_hint_for_generic_errors() {
        let err = ApiError::from_response(403, None, &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.user_message(), "You do not have permission for this action.");

        let err = ApiError::new(409, "clientId already taken");
        assert_eq!(err.user_message(), "clientId already taken");

        let err = ApiError::from_response(418, None, &GATEWAY_MESSAGE_KEYS);
        assert_eq!(err.user_message(), "HTTP error 418");
    }

    #[test]
    fn base_url_missing_is_client_side() {
        let err = ApiError::base_url_missing();
        assert!(err.is_client_side());
        assert_eq!(err.message, "Base URL not configured");
        assert_eq!(Error::from(err).status(), Some(0));
    }
}
