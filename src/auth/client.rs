// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth client for login and token refresh.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::endpoints;
use crate::error::{ApiError, Error, AUTH_MESSAGE_KEYS};
use crate::http::{join_url, read_body, string_field, DEVICE_HEADER, TENANT_HEADER};
use crate::session::normalize_base_url;

const ACCESS_TOKEN_KEYS: [&str; 2] = ["access_token", "accessToken"];
const REFRESH_TOKEN_KEYS: [&str; 2] = ["refresh_token", "refreshToken"];

/// Access token plus the rotated refresh token, when the backend sends one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Extract the pair from an auth response body.
    fn from_body(body: Option<Value>, missing_message: &str) -> Result<Self, ApiError> {
        let Some(access_token) = string_field(body.as_ref(), &ACCESS_TOKEN_KEYS) else {
            return Err(ApiError::new(0, missing_message).with_details(body));
        };
        Ok(Self {
            access_token,
            refresh_token: string_field(body.as_ref(), &REFRESH_TOKEN_KEYS),
        })
    }
}

/// Credentials for `POST /api/v1/app/auth/login`.
pub struct LoginRequest<'a> {
    pub base_url: &'a str,
    pub tenant_id: u64,
    pub device_id: &'a str,
    pub identifier: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    identificador: &'a str,
    senha: &'a str,
}

/// Issues the login and refresh calls.
///
/// Holds no state besides the shared connection pool.
#[derive(Debug, Clone, Default)]
pub struct AuthClient {
    http: Client,
}

impl AuthClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// Non-2xx responses become [`ApiError`] with the message taken from the
    /// body's `message`, `error` or `title` field.
    pub async fn refresh(
        &self,
        base_url: &str,
        device_id: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, Error> {
        let url = join_url(&normalize_base_url(base_url), &endpoints::auth_refresh());

        let mut request = self
            .http
            .post(&url)
            .json(&RefreshBody { refresh_token });
        if !device_id.is_empty() {
            request = request.header(DEVICE_HEADER, device_id);
        }

        debug!(url = %url, "Refreshing access token");
        let response = request.send().await?;
        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token refresh rejected");
            return Err(ApiError::from_response(status.as_u16(), body, &AUTH_MESSAGE_KEYS).into());
        }

        Ok(TokenPair::from_body(
            body,
            "Refresh did not return an access token",
        )?)
    }

    /// Sign in with operator credentials.
    pub async fn login(&self, request: LoginRequest<'_>) -> Result<TokenPair, Error> {
        let url = join_url(&normalize_base_url(request.base_url), &endpoints::auth_login());

        let response = self
            .http
            .post(&url)
            .header(TENANT_HEADER, request.tenant_id.to_string())
            .header(DEVICE_HEADER, request.device_id)
            .json(&LoginBody {
                identificador: request.identifier.trim(),
                senha: request.password,
            })
            .send()
            .await?;
        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                tenant_id = request.tenant_id,
                "Login rejected"
            );
            return Err(ApiError::from_response(status.as_u16(), body, &AUTH_MESSAGE_KEYS).into());
        }

        Ok(TokenPair::from_body(body, "Login did not return an access token")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_backend;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    #[test]
    fn token_pair_accepts_both_key_styles() {
        let pair = TokenPair::from_body(
            Some(json!({ "accessToken": "a", "refresh_token": "r" })),
            "missing",
        )
        .unwrap();
        assert_eq!(pair.access_token, "a");
        assert_eq!(pair.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn token_pair_treats_empty_refresh_token_as_absent() {
        let pair =
            TokenPair::from_body(Some(json!({ "access_token": "a", "refreshToken": "" })), "missing")
                .unwrap();
        assert!(pair.refresh_token.is_none());
    }

    #[test]
    fn token_pair_requires_access_token() {
        let err = TokenPair::from_body(Some(json!({ "refreshToken": "r" })), "missing").unwrap_err();
        assert_eq!(err.status, 0);
        assert_eq!(err.message, "missing");
        assert_eq!(err.details, Some(json!({ "refreshToken": "r" })));
    }

    #[tokio::test]
    async fn refresh_sends_token_and_device_header() {
        let router = Router::new().route(
            "/api/v1/app/auth/refresh",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(body["refreshToken"], "old-refresh");
                assert_eq!(headers.get(DEVICE_HEADER).unwrap(), "device-1");
                Json(json!({ "access_token": "new-access", "refresh_token": "new-refresh" }))
            }),
        );
        let base_url = spawn_backend(router).await;

        let pair = AuthClient::default()
            .refresh(&format!("{base_url}/"), "device-1", "old-refresh")
            .await
            .unwrap();
        assert_eq!(pair.access_token, "new-access");
        assert_eq!(pair.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn refresh_error_uses_body_message() {
        let router = Router::new().route(
            "/api/v1/app/auth/refresh",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "token expired" })),
                )
            }),
        );
        let base_url = spawn_backend(router).await;

        let err = AuthClient::default()
            .refresh(&base_url, "", "stale")
            .await
            .unwrap_err();
        let api = err.as_api().expect("api error");
        assert_eq!(api.status, 400);
        assert_eq!(api.message, "token expired");
    }

    #[tokio::test]
    async fn refresh_without_access_token_is_rejected() {
        let router = Router::new().route(
            "/api/v1/app/auth/refresh",
            post(|| async { Json(json!({ "refresh_token": "only-refresh" })) }),
        );
        let base_url = spawn_backend(router).await;

        let err = AuthClient::default()
            .refresh(&base_url, "", "r")
            .await
            .unwrap_err();
        let api = err.as_api().expect("api error");
        assert_eq!(api.status, 0);
        assert_eq!(api.message, "Refresh did not return an access token");
    }

    #[tokio::test]
    async fn login_sends_credentials_and_tenant_header() {
        let router = Router::new().route(
            "/api/v1/app/auth/login",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(body["identificador"], "ops@awis.example");
                assert_eq!(body["senha"], "s3cret!");
                assert_eq!(headers.get(TENANT_HEADER).unwrap(), "128");
                assert_eq!(headers.get(DEVICE_HEADER).unwrap(), "dev-7");
                Json(json!({ "accessToken": "acc", "refreshToken": "ref" }))
            }),
        );
        let base_url = spawn_backend(router).await;

        let pair = AuthClient::default()
            .login(LoginRequest {
                base_url: &base_url,
                tenant_id: 128,
                device_id: "dev-7",
                identifier: " ops@awis.example ",
                password: "s3cret!",
            })
            .await
            .unwrap();
        assert_eq!(pair.access_token, "acc");
        assert_eq!(pair.refresh_token.as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn login_failure_falls_back_to_generic_message() {
        let router = Router::new().route(
            "/api/v1/app/auth/login",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base_url = spawn_backend(router).await;

        let err = AuthClient::default()
            .login(LoginRequest {
                base_url: &base_url,
                tenant_id: 128,
                device_id: "dev",
                identifier: "a@b.c",
                password: "wrong-password",
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.as_api().unwrap().message, "HTTP error 401");
    }
}
