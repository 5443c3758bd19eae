// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire helpers shared by the auth client and the request gateway.

use serde_json::{json, Value};

/// Header carrying the numeric tenant id.
pub const TENANT_HEADER: &str = "X-Progem-ID";

/// Header carrying the console's device identifier.
pub const DEVICE_HEADER: &str = "X-Device-ID";

/// Join a base URL and an absolute path.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

/// Parse a response body.
///
/// JSON when it parses, `{ "raw": text }` otherwise, `None` when empty.
pub fn parse_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text })))
}

/// Read and parse a response body.
pub async fn read_body(response: reqwest::Response) -> Result<Option<Value>, reqwest::Error> {
    let text = response.text().await?;
    Ok(parse_body(&text))
}

/// First non-empty string among `keys`, trimmed.
pub fn string_field(body: Option<&Value>, keys: &[&str]) -> Option<String> {
    let body = body?;
    keys.iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
