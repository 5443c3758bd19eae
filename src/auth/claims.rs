// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims decoded from the access token.

use std::collections::BTreeSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::roles::Role;

/// Claims read from the access token payload.
///
/// Decoding never verifies the signature; these claims are only used to gate
/// console features. Recompute whenever the access token changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthClaims {
    /// Subject (`sub`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Role names (`roles`), kept as strings so unknown roles survive
    pub roles: BTreeSet<String>,

    /// Expiration (`exp`, Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl AuthClaims {
    /// Decode the payload segment of `token`.
    ///
    /// Only the second segment has to be a base64url JSON object; a missing
    /// signature or a header without `alg` is accepted. Returns `None`
    /// otherwise.
    pub fn decode(token: &str) -> Option<Self> {
        if let Ok(data) = jsonwebtoken::dangerous::insecure_decode::<Value>(token) {
            return Some(Self::from_payload(&data.claims));
        }
        let payload = decode_segment(token.split('.').nth(1)?)?;
        payload.is_object().then(|| Self::from_payload(&payload))
    }

    fn from_payload(payload: &Value) -> Self {
        let subject = match payload.get("sub") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let roles = payload
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let expires_at = payload
            .get("exp")
            .and_then(|exp| exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64)));

        Self {
            subject,
            roles,
            expires_at,
        }
    }

    /// Expired relative to `now` (Unix seconds). A missing or zero `exp`
    /// never expires.
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(exp) if exp != 0 && exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role.as_str())
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// Roles recognized by this client.
    pub fn known_roles(&self) -> Vec<Role> {
        self.roles.iter().filter_map(|r| Role::parse(r)).collect()
    }
}

/// base64url JSON, padded or not; standard alphabet characters are accepted.
fn decode_segment(segment: &str) -> Option<Value> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}
