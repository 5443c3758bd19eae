// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path builders for the AWIS backend.
//!
//! All paths are absolute and are joined to the session base URL by the
//! gateway.

use url::form_urlencoded;

use crate::auth::Role;

// ========== Auth ==========

pub fn auth_login() -> String {
    "/api/v1/app/auth/login".to_string()
}

pub fn auth_refresh() -> String {
    "/api/v1/app/auth/refresh".to_string()
}

// ========== API Clients (tenants) ==========

/// List and create.
pub fn api_clients() -> String {
    "/api/v1/api-clients".to_string()
}

/// Get and update.
pub fn api_client(id: u64) -> String {
    format!("/api/v1/api-clients/{id}")
}

pub fn api_client_detail(id: u64) -> String {
    format!("/api/v1/api-clients/{id}/detail")
}

pub fn api_client_status(id: u64, active: bool) -> String {
    format!("/api/v1/api-clients/{id}/status?ativo={active}")
}

/// Rotate the client secret (shown once).
pub fn api_client_rotate_secret(id: u64) -> String {
    format!("/api/v1/api-clients/{id}/secret:rotate")
}

// ========== Unit Linkage ==========

pub fn api_client_units(api_client_id: u64) -> String {
    format!("/api/v1/api-clients/{api_client_id}/unidades")
}

/// Link (PUT) or unlink (DELETE) a unit.
pub fn api_client_unit(api_client_id: u64, unit_id: u64) -> String {
    format!("/api/v1/api-clients/{api_client_id}/unidades/{unit_id}")
}

/// Link the head-office unit of a tenant, no search involved.
pub fn api_client_link_matrix(api_client_id: u64, tenant_id: u64) -> String {
    format!("/api/v1/api-clients/{api_client_id}/unidades/matriz/{tenant_id}")
}

/// Units of the tenant selected by the tenant header.
pub fn company_units() -> String {
    "/api/v1/api-clients/empresa/unidades".to_string()
}

// ========== Webhooks ==========

pub fn webhook_endpoints(tenant_id: Option<u64>) -> String {
    with_tenant("/api/v1/webhooks/endpoints".to_string(), tenant_id)
}

pub fn webhook_endpoint(id: u64, tenant_id: Option<u64>) -> String {
    with_tenant(format!("/api/v1/webhooks/endpoints/{id}"), tenant_id)
}

fn with_tenant(path: String, tenant_id: Option<u64>) -> String {
    match tenant_id.filter(|id| *id > 0) {
        Some(id) => format!("{path}?empresaId={id}"),
        None => path,
    }
}

// ========== Admin Users & Roles ==========

/// Filters for the admin user listing. Blank values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub tenant_id: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

pub fn admin_users(query: &UserQuery) -> String {
    let mut qs = form_urlencoded::Serializer::new(String::new());
    let mut any = false;

    let text_filters = [
        ("q", &query.q),
        ("status", &query.status),
        ("role", &query.role),
        ("empresaId", &query.tenant_id),
    ];
    for (key, value) in text_filters {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            qs.append_pair(key, value);
            any = true;
        }
    }
    if let Some(page) = query.page {
        qs.append_pair("page", &page.to_string());
        any = true;
    }
    if let Some(size) = query.size {
        qs.append_pair("size", &size.to_string());
        any = true;
    }
    if let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) {
        qs.append_pair("sort", sort);
        any = true;
    }

    if any {
        format!("/api/v1/app/admin/users?{}", qs.finish())
    } else {
        "/api/v1/app/admin/users".to_string()
    }
}

pub fn admin_user_roles(user_id: u64) -> String {
    format!("/api/v1/app/admin/users/{user_id}/roles")
}

/// Add (POST) or remove (DELETE) a role.
pub fn admin_user_role(user_id: u64, role: Role) -> String {
    format!("/api/v1/app/admin/users/{user_id}/roles/{}", role.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_client_paths() {
        assert_eq!(api_client(7), "/api/v1/api-clients/7");
        assert_eq!(api_client_status(7, false), "/api/v1/api-clients/7/status?ativo=false");
        assert_eq!(api_client_rotate_secret(3), "/api/v1/api-clients/3/secret:rotate");
        assert_eq!(api_client_unit(3, 11), "/api/v1/api-clients/3/unidades/11");
        assert_eq!(
            api_client_link_matrix(3, 128),
            "/api/v1/api-clients/3/unidades/matriz/128"
        );
    }

    #[test]
    fn webhook_paths_include_tenant_only_when_set() {
        assert_eq!(webhook_endpoints(None), "/api/v1/webhooks/endpoints");
        assert_eq!(webhook_endpoints(Some(0)), "/api/v1/webhooks/endpoints");
        assert_eq!(
            webhook_endpoints(Some(128)),
            "/api/v1/webhooks/endpoints?empresaId=128"
        );
        assert_eq!(
            webhook_endpoint(5, Some(128)),
            "/api/v1/webhooks/endpoints/5?empresaId=128"
        );
    }

    #[test]
    fn admin_users_omits_blank_filters() {
        assert_eq!(admin_users(&UserQuery::default()), "/api/v1/app/admin/users");

        let query = UserQuery {
            q: Some("  ".to_string()),
            status: Some("ATIVO".to_string()),
            role: Some(String::new()),
            tenant_id: Some(" 128 ".to_string()),
            page: Some(0),
            size: Some(20),
            sort: Some("id,desc".to_string()),
        };
        assert_eq!(
            admin_users(&query),
            "/api/v1/app/admin/users?status=ATIVO&empresaId=128&page=0&size=20&sort=id%2Cdesc"
        );
    }

    #[test]
    fn admin_users_encodes_search_text() {
        let query = UserQuery {
            q: Some("ana&maria@x.com".to_string()),
            ..UserQuery::default()
        };
        assert_eq!(
            admin_users(&query),
            "/api/v1/app/admin/users?q=ana%26maria%40x.com"
        );
    }

    #[test]
    fn role_paths_use_wire_names() {
        assert_eq!(admin_user_roles(9), "/api/v1/app/admin/users/9/roles");
        assert_eq!(
            admin_user_role(9, Role::Adm),
            "/api/v1/app/admin/users/9/roles/ADM"
        );
    }
}
