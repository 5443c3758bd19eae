// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # AWIS API Data Models
//!
//! Request and response bodies of the AWIS admin API. Field names follow the
//! backend's Portuguese wire names through `serde(rename)`; Rust names are
//! English.
//!
//! Response types tolerate missing optional fields, and the summary types
//! keep unknown fields in `extra` so nothing the backend sends is lost when
//! printed back.
//!
//! ## Model Categories
//!
//! - **API Clients**: tenants integrating with AWIS, their credentials and scopes
//! - **Units**: branches linked to an API client
//! - **Webhooks**: event delivery endpoints per tenant
//! - **Admin Users**: application users and their role assignments

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// API Clients
// =============================================================================

/// Item of the API client listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiClientSummary {
    pub id: u64,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "ativo", default)]
    pub active: bool,
    /// Head-office tenant (`X-Progem-ID`).
    #[serde(rename = "empresaId", default)]
    pub tenant_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full API client record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiClientDetail {
    pub id: u64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "clientId", default)]
    pub client_id: String,
    #[serde(rename = "ativo", default)]
    pub active: bool,
    #[serde(rename = "empresaId", default)]
    pub tenant_id: u64,
    #[serde(rename = "dominio", default)]
    pub domain: Option<String>,
    /// Space separated scope list.
    #[serde(rename = "escopos", default)]
    pub scopes: Option<String>,
}

impl ApiClientDetail {
    pub fn scope_list(&self) -> Vec<&str> {
        self.scopes
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Create or update body for an API client.
///
/// `client_secret` is required on create and optional on update (only sent
/// when rotating it by hand).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiClientPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "empresaId")]
    pub tenant_id: u64,
    #[serde(rename = "escopos")]
    pub scopes: String,
    #[serde(rename = "dominio")]
    pub domain: Option<String>,
    #[serde(rename = "clientSecret", skip_serializing_if = "Option::is_none", default)]
    pub client_secret: Option<String>,
}

impl ApiClientPayload {
    /// Trimmed copy: lowercase client id, bare domain, blank domain and
    /// secret dropped, scopes joined by single spaces.
    pub fn normalized(&self) -> Self {
        let client_secret = self
            .client_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            name: self.name.trim().to_string(),
            client_id: self.client_id.trim().to_lowercase(),
            tenant_id: self.tenant_id,
            scopes: self.scopes.split_whitespace().collect::<Vec<_>>().join(" "),
            domain: self
                .domain
                .as_deref()
                .map(normalize_domain)
                .filter(|d| !d.is_empty()),
            client_secret,
        }
    }
}

/// Host part of a tenant domain: lowercase, no `http(s)://` prefix and no
/// trailing slashes.
pub fn normalize_domain(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let bare = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    bare.trim_end_matches('/').trim().to_string()
}

/// New credentials returned by a secret rotation. Shown once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotatedSecret {
    #[serde(rename = "clientId", alias = "client_id")]
    pub client_id: String,
    #[serde(rename = "clientSecret", alias = "client_secret")]
    pub client_secret: String,
}

// =============================================================================
// Units
// =============================================================================

/// Link between an API client and a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiClientUnit {
    pub id: u64,
    #[serde(rename = "apiClientId")]
    pub api_client_id: u64,
    #[serde(rename = "unidadeId")]
    pub unit_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitContact {
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Unit of the tenant selected by the tenant header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyUnit {
    pub id: u64,
    #[serde(rename = "nomeFantasia", default)]
    pub trade_name: Option<String>,
    #[serde(rename = "razaoSocial", default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(rename = "contato", default)]
    pub contact: Option<UnitContact>,
    #[serde(rename = "endereco", default)]
    pub address: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Webhooks
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub id: u64,
    pub url: String,
    #[serde(rename = "eventos", default)]
    pub events: Vec<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookCreate {
    #[serde(rename = "empresaId")]
    pub tenant_id: u64,
    pub url: String,
    #[serde(rename = "eventos")]
    pub events: Vec<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Signing secret; generated by the backend when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookUpdate {
    #[serde(rename = "empresaId")]
    pub tenant_id: u64,
    pub url: String,
    #[serde(rename = "eventos")]
    pub events: Vec<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "ativo", skip_serializing_if = "Option::is_none", default)]
    pub active: Option<bool>,
}

// =============================================================================
// Admin Users
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: u64,
    #[serde(rename = "empresaId", default)]
    pub tenant_id: Option<u64>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(rename = "celular", default)]
    pub mobile: Option<String>,
    /// `ATIVO`, `INATIVO`, `PENDENTE`, or any future status.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "ultimoLoginEm", default)]
    pub last_login_at: Option<String>,
    #[serde(rename = "criadoEm", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Roles assigned to one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRoles {
    #[serde(rename = "userId")]
    pub user_id: u64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserRoles {
    /// Drop duplicate role names, keeping first occurrence order.
    pub fn dedup(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.roles.retain(|r| seen.insert(r.clone()));
        self
    }
}

/// Spring-style page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub first: Option<bool>,
    #[serde(default)]
    pub last: Option<bool>,
}
