// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Gateway
//!
//! Issues every AWIS API call with the current session credentials and
//! recovers from an expired access token exactly once per call.
//!
//! ## Call Lifecycle
//!
//! ```text
//! Issuing ──2xx──────────────▶ Succeeded
//!    │ ──non-2xx (not 401)──▶ Failed
//!    │ ──401 + refresh token + first attempt
//!    ▼
//! NeedsRefresh ──refresh ok──▶ Retrying ──2xx──▶ Succeeded
//!    │                            └──non-2xx──▶ Failed (no second refresh)
//!    └──refresh failed──▶ Failed with the original 401
//! ```
//!
//! Concurrent calls that hit `401` share one refresh through
//! [`PendingRefresh`]. The refreshed tokens are persisted before the retry so
//! later calls pick them up without refreshing again.

pub mod single_flight;

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::{AuthClient, TokenPair};
use crate::config::ConsoleConfig;
use crate::error::{ApiError, Error, GATEWAY_MESSAGE_KEYS};
use crate::http::{join_url, read_body, DEVICE_HEADER, TENANT_HEADER};
use crate::session::{normalize_base_url, Session, SessionStore};

pub use single_flight::{PendingRefresh, RefreshOutcome};

/// Authenticated HTTP gateway to the AWIS backend.
pub struct RequestGateway {
    http: Client,
    auth: AuthClient,
    store: Arc<dyn SessionStore>,
    default_base_url: Option<String>,
    pending: PendingRefresh,
}

impl RequestGateway {
    /// Create a gateway sharing `http` with its auth client.
    pub fn new(http: Client, store: Arc<dyn SessionStore>) -> Self {
        Self {
            auth: AuthClient::new(http.clone()),
            http,
            store,
            default_base_url: None,
            pending: PendingRefresh::new(),
        }
    }

    /// Build from runtime configuration.
    pub fn from_config(config: &ConsoleConfig, store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let http = config.http_client()?;
        Ok(Self::new(http, store).with_default_base_url(config.default_base_url.clone()))
    }

    /// Base URL used when the session has none.
    pub fn with_default_base_url(mut self, base_url: Option<String>) -> Self {
        self.default_base_url = base_url
            .map(|url| normalize_base_url(&url))
            .filter(|url| !url.is_empty());
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn auth_client(&self) -> &AuthClient {
        &self.auth
    }

    // ========== Verbs ==========

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send_json(Method::GET, path, None).await
    }

    /// POST `body`; `None` sends `{}`.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send_json(Method::POST, path, Some(body)).await
    }

    /// PUT `body`; `None` sends `{}`.
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send_json(Method::PUT, path, Some(body)).await
    }

    /// PATCH `body`; `None` sends `{}`.
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send_json(Method::DELETE, path, None).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, Error> {
        let parsed = self.request(method, path, body).await?;
        serde_json::from_value(parsed.unwrap_or(Value::Null)).map_err(Error::Decode)
    }

    // ========== Core ==========

    /// Perform one logical call.
    ///
    /// Returns the parsed body of a 2xx response: JSON, `{ "raw": text }` for
    /// non-JSON text, or `None` when empty.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, Error> {
        let mut retry = true;

        loop {
            let session = self.store.load();
            let base_url = self.resolve_base_url(&session)?;

            let response = self
                .build(&method, &base_url, path, &session, body.as_ref())
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::UNAUTHORIZED && retry && session.has_refresh_token() {
                match self.refresh_session(&session, &base_url).await {
                    Ok(()) => {
                        debug!(method = %method, path = %path, "Retrying after token refresh");
                        retry = false;
                        continue;
                    }
                    Err(e) => {
                        // The caller sees the original 401, not the refresh failure.
                        warn!(
                            method = %method,
                            path = %path,
                            error = %e,
                            "Token refresh failed; surfacing original response"
                        );
                    }
                }
            }

            let parsed = read_body(response).await?;

            if !status.is_success() {
                debug!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    "Request failed"
                );
                return Err(ApiError::from_response(status.as_u16(), parsed, &GATEWAY_MESSAGE_KEYS).into());
            }

            return Ok(parsed);
        }
    }

    fn resolve_base_url(&self, session: &Session) -> Result<String, ApiError> {
        let from_session = normalize_base_url(&session.base_url);
        if !from_session.is_empty() {
            return Ok(from_session);
        }
        self.default_base_url
            .clone()
            .ok_or_else(ApiError::base_url_missing)
    }

    fn build(
        &self,
        method: &Method,
        base_url: &str,
        path: &str,
        session: &Session,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let mut request = self
            .http
            .request(method.clone(), join_url(base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if session.has_access_token() {
            request = request.bearer_auth(&session.access_token);
        }
        if session.tenant_id > 0 {
            request = request.header(TENANT_HEADER, session.tenant_id.to_string());
        }
        if !session.device_id.is_empty() {
            request = request.header(DEVICE_HEADER, &session.device_id);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        request
    }

    /// Refresh through the shared handle and persist the new tokens.
    async fn refresh_session(&self, session: &Session, base_url: &str) -> Result<(), Arc<Error>> {
        let tokens = self
            .pending
            .run(|| {
                self.auth
                    .refresh(base_url, &session.device_id, &session.refresh_token)
            })
            .await?;

        let next = refreshed_session(session, base_url, tokens);
        self.store
            .save(&next)
            .map_err(|e| Arc::new(Error::Store(e)))?;
        info!("Access token refreshed");
        Ok(())
    }

    /// Whether a refresh is currently in flight.
    pub fn refresh_pending(&self) -> bool {
        self.pending.is_pending()
    }
}

/// Session after a successful refresh.
///
/// Keeps the prior refresh token when the backend did not rotate it.
fn refreshed_session(session: &Session, base_url: &str, tokens: TokenPair) -> Session {
    Session {
        base_url: base_url.to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens
            .refresh_token
            .unwrap_or_else(|| session.refresh_token.clone()),
        ..session.clone()
    }
}

fn json_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Value, Error> {
    match body {
        Some(body) => serde_json::to_value(body).map_err(Error::Encode),
        None => Ok(json!({})),
    }
}
