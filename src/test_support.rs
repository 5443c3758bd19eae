// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test helpers: a mock AWIS backend on an ephemeral port and unsigned JWTs.

use std::net::SocketAddr;

use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tokio::net::TcpListener;

/// Serve `router` on `127.0.0.1:0` and return the base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend failed");
    });
    format!("http://{addr}")
}

/// Unsigned JWT carrying `claims` (signature is never checked client-side).
pub fn unsigned_jwt(claims: &serde_json::Value) -> String {
    let header = r#"{"alg":"HS256","typ":"JWT"}"#;
    format!(
        "{}.{}.fake_signature",
        URL_SAFE_NO_PAD.encode(header.as_bytes()),
        URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes())
    )
}
