// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session record and its normalization rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tenant id used when none (or an invalid one) is stored.
pub const DEFAULT_TENANT_ID: u64 = 128;

/// Persisted credential bundle.
///
/// Invariants after [`Session::normalized`]: `base_url` has no trailing slash
/// and neither token carries a `Bearer ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub base_url: String,
    pub tenant_id: u64,
    pub device_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tenant_id: DEFAULT_TENANT_ID,
            device_id: String::new(),
            access_token: String::new(),
            refresh_token: String::new(),
        }
    }
}

impl Session {
    /// Apply the storage normalization rules.
    pub fn normalized(self) -> Self {
        Self {
            base_url: normalize_base_url(&self.base_url),
            tenant_id: if self.tenant_id > 0 {
                self.tenant_id
            } else {
                DEFAULT_TENANT_ID
            },
            device_id: self.device_id.trim().to_string(),
            access_token: strip_bearer(&self.access_token),
            refresh_token: strip_bearer(&self.refresh_token),
        }
    }

    /// Build a session from an arbitrary stored JSON value.
    ///
    /// Unknown shapes and wrongly typed fields fall back to defaults instead
    /// of failing. `empresaId` is accepted for records written by older
    /// console versions.
    pub fn from_stored(value: &Value) -> Self {
        let tenant = value.get("tenantId").or_else(|| value.get("empresaId"));

        Self {
            base_url: lenient_string(value.get("baseUrl")),
            tenant_id: tenant.map(coerce_tenant_id).unwrap_or(DEFAULT_TENANT_ID),
            device_id: lenient_string(value.get("deviceId")),
            access_token: lenient_string(value.get("accessToken")),
            refresh_token: lenient_string(value.get("refreshToken")),
        }
        .normalized()
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Same session with both tokens removed.
    ///
    /// Base URL, tenant and device survive a sign-out.
    pub fn signed_out(&self) -> Self {
        Self {
            access_token: String::new(),
            refresh_token: String::new(),
            ..self.clone()
        }
    }
}

/// Trim and drop every trailing `/`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Trim and remove a case-insensitive `Bearer` scheme prefix.
pub fn strip_bearer(token: &str) -> String {
    let token = token.trim();
    if let Some(prefix) = token.get(..6) {
        let rest = &token[6..];
        if prefix.eq_ignore_ascii_case("bearer") && rest.starts_with(char::is_whitespace) {
            return rest.trim_start().to_string();
        }
    }
    token.to_string()
}

fn lenient_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_tenant_id(value: &Value) -> u64 {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 1.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.filter(|id| *id > 0).unwrap_or(DEFAULT_TENANT_ID)
}
