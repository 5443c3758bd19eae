// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API clients (tenants), their credentials and unit linkage.

use reqwest::Method;
use serde_json::json;
use tracing::info;

use super::{decode_list, endpoints, webhooks};
use crate::error::Error;
use crate::gateway::RequestGateway;
use crate::models::{
    ApiClientDetail, ApiClientPayload, ApiClientSummary, ApiClientUnit, CompanyUnit,
    RotatedSecret,
};
use crate::session::normalize_base_url;

pub async fn list(gateway: &RequestGateway) -> Result<Vec<ApiClientSummary>, Error> {
    let body = gateway
        .request(Method::GET, &endpoints::api_clients(), None)
        .await?;
    decode_list(body)
}

pub async fn get(gateway: &RequestGateway, id: u64) -> Result<ApiClientSummary, Error> {
    gateway.get(&endpoints::api_client(id)).await
}

pub async fn detail(gateway: &RequestGateway, id: u64) -> Result<ApiClientDetail, Error> {
    gateway.get(&endpoints::api_client_detail(id)).await
}

/// Create an API client. The payload is normalized before sending.
pub async fn create(
    gateway: &RequestGateway,
    payload: &ApiClientPayload,
) -> Result<ApiClientSummary, Error> {
    let payload = payload.normalized();
    let created: ApiClientSummary = gateway
        .post(&endpoints::api_clients(), Some(&payload))
        .await?;
    info!(id = created.id, tenant_id = payload.tenant_id, "API client created");
    Ok(created)
}

pub async fn update(
    gateway: &RequestGateway,
    id: u64,
    payload: &ApiClientPayload,
) -> Result<ApiClientSummary, Error> {
    gateway
        .put(&endpoints::api_client(id), Some(&payload.normalized()))
        .await
}

/// Activate or deactivate.
pub async fn set_status(gateway: &RequestGateway, id: u64, active: bool) -> Result<(), Error> {
    gateway
        .request(
            Method::PATCH,
            &endpoints::api_client_status(id, active),
            Some(json!({})),
        )
        .await?;
    info!(id, active, "API client status changed");
    Ok(())
}

/// Rotate the client secret. The returned secret cannot be read again.
pub async fn rotate_secret(gateway: &RequestGateway, id: u64) -> Result<RotatedSecret, Error> {
    let rotated: RotatedSecret = gateway
        .post(&endpoints::api_client_rotate_secret(id), None::<&()>)
        .await?;
    info!(id, "API client secret rotated");
    Ok(rotated)
}

// ========== Units ==========

pub async fn units(gateway: &RequestGateway, id: u64) -> Result<Vec<ApiClientUnit>, Error> {
    let body = gateway
        .request(Method::GET, &endpoints::api_client_units(id), None)
        .await?;
    decode_list(body)
}

pub async fn link_unit(gateway: &RequestGateway, id: u64, unit_id: u64) -> Result<(), Error> {
    gateway
        .request(
            Method::PUT,
            &endpoints::api_client_unit(id, unit_id),
            Some(json!({})),
        )
        .await?;
    Ok(())
}

pub async fn unlink_unit(gateway: &RequestGateway, id: u64, unit_id: u64) -> Result<(), Error> {
    gateway
        .request(Method::DELETE, &endpoints::api_client_unit(id, unit_id), None)
        .await?;
    Ok(())
}

/// Link the head-office unit of `tenant_id`.
pub async fn link_matrix(gateway: &RequestGateway, id: u64, tenant_id: u64) -> Result<(), Error> {
    gateway
        .request(
            Method::PUT,
            &endpoints::api_client_link_matrix(id, tenant_id),
            Some(json!({})),
        )
        .await?;
    Ok(())
}

/// Units of the tenant in the current session.
pub async fn company_units(gateway: &RequestGateway) -> Result<Vec<CompanyUnit>, Error> {
    let body = gateway
        .request(Method::GET, &endpoints::company_units(), None)
        .await?;
    decode_list(body)
}

/// `.env` lines an integrator needs to call AWIS as this client.
///
/// `X-Progem-ID` is always the tenant (unit) id; `clientId` identifies the
/// integrator. The secret is never readable back, so it is left as a
/// placeholder to fill from the last rotation.
pub fn env_snippet(detail: &ApiClientDetail, base_url: &str) -> String {
    let mut lines = vec![
        format!("# AWIS integration: {}", detail.name.trim()),
        format!("AWIS_API_BASE_URL={}", normalize_base_url(base_url)),
        format!("AWIS_PROGEM_ID={}", detail.tenant_id),
        format!("AWIS_CLIENT_ID={}", detail.client_id),
        "AWIS_CLIENT_SECRET=<secret shown on rotation>".to_string(),
    ];
    if !detail.scope_list().is_empty() {
        lines.push(format!("AWIS_SCOPES=\"{}\"", detail.scope_list().join(" ")));
    }
    if let Some(url) = detail.domain.as_deref().and_then(webhooks::default_url) {
        lines.push(format!("AWIS_WEBHOOK_URL={url}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, Session};
    use crate::test_support::spawn_backend;
    use axum::{
        extract::Path,
        http::{Method as HttpMethod, Uri},
        routing::{any, get as get_route, post},
        Json, Router,
    };
    use serde_json::Value;
    use std::sync::Arc;

    async fn gateway_for(router: Router) -> RequestGateway {
        let base_url = spawn_backend(router).await;
        let store = MemorySessionStore::with_session(&Session {
            base_url,
            access_token: "acc".to_string(),
            ..Session::default()
        })
        .unwrap();
        RequestGateway::new(reqwest::Client::new(), Arc::new(store))
    }

    #[tokio::test]
    async fn list_tolerates_non_array_body() {
        let gateway = gateway_for(Router::new().route(
            "/api/v1/api-clients",
            get_route(|| async { Json(json!({ "unexpected": true })) }),
        ))
        .await;
        assert!(list(&gateway).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_sends_normalized_payload() {
        let gateway = gateway_for(Router::new().route(
            "/api/v1/api-clients",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["clientId"], "pax-santacruz");
                assert_eq!(body["dominio"], Value::Null);
                assert_eq!(body["clientSecret"], "secret-123");
                Json(json!({ "id": 9, "nome": body["nome"], "ativo": true, "empresaId": 128 }))
            }),
        ))
        .await;

        let created = create(
            &gateway,
            &ApiClientPayload {
                name: "Pax".to_string(),
                client_id: "PAX-SantaCruz".to_string(),
                tenant_id: 128,
                scopes: "read:planos".to_string(),
                domain: None,
                client_secret: Some(" secret-123 ".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(created.name.as_deref(), Some("Pax"));
    }

    #[tokio::test]
    async fn status_and_unit_linkage_use_expected_routes() {
        let router = Router::new().route(
            "/{*rest}",
            any(|method: HttpMethod, uri: Uri| async move {
                Json(json!({ "method": method.as_str(), "uri": uri.to_string() }))
            }),
        );
        let gateway = gateway_for(router).await;

        set_status(&gateway, 3, false).await.unwrap();
        link_unit(&gateway, 3, 11).await.unwrap();
        unlink_unit(&gateway, 3, 11).await.unwrap();
        link_matrix(&gateway, 3, 128).await.unwrap();

        let echoed = gateway
            .request(Method::PATCH, &endpoints::api_client_status(3, true), Some(json!({})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(echoed["method"], "PATCH");
        assert_eq!(echoed["uri"], "/api/v1/api-clients/3/status?ativo=true");
    }

    #[tokio::test]
    async fn rotate_secret_and_units() {
        let router = Router::new()
            .route(
                "/api/v1/api-clients/{id}/secret:rotate",
                post(|Path(id): Path<String>| async move {
                    assert_eq!(id, "5");
                    Json(json!({ "clientId": "pax", "clientSecret": "once" }))
                }),
            )
            .route(
                "/api/v1/api-clients/{id}/unidades",
                get_route(|| async {
                    Json(json!([{ "id": 1, "apiClientId": 5, "unidadeId": 130 }]))
                }),
            )
            .route(
                "/api/v1/api-clients/empresa/unidades",
                get_route(|| async {
                    Json(json!([{ "id": 130, "nomeFantasia": "Filial Centro", "cnpj": null }]))
                }),
            );
        let gateway = gateway_for(router).await;

        let rotated = rotate_secret(&gateway, 5).await.unwrap();
        assert_eq!(rotated.client_secret, "once");

        let linked = units(&gateway, 5).await.unwrap();
        assert_eq!(linked[0].unit_id, 130);

        let company = company_units(&gateway).await.unwrap();
        assert_eq!(company[0].trade_name.as_deref(), Some("Filial Centro"));
    }

    #[test]
    fn env_snippet_lists_credentials_and_webhook_url() {
        let detail = ApiClientDetail {
            id: 4,
            name: "Pax Santa Cruz".to_string(),
            client_id: "pax-santacruz".to_string(),
            active: true,
            tenant_id: 130,
            domain: Some("https://Pax.Example/".to_string()),
            scopes: Some("read:planos  write:notas".to_string()),
        };

        let snippet = env_snippet(&detail, "https://api.awis.example/");
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# AWIS integration: Pax Santa Cruz",
                "AWIS_API_BASE_URL=https://api.awis.example",
                "AWIS_PROGEM_ID=130",
                "AWIS_CLIENT_ID=pax-santacruz",
                "AWIS_CLIENT_SECRET=<secret shown on rotation>",
                "AWIS_SCOPES=\"read:planos write:notas\"",
                "AWIS_WEBHOOK_URL=https://pax.example/api/webhooks/progem",
            ]
        );
    }

    #[test]
    fn env_snippet_without_domain_or_scopes() {
        let detail = ApiClientDetail {
            id: 4,
            name: "Pax".to_string(),
            client_id: "pax".to_string(),
            active: false,
            tenant_id: 128,
            domain: None,
            scopes: None,
        };
        let snippet = env_snippet(&detail, "https://api.awis.example");
        assert!(!snippet.contains("AWIS_WEBHOOK_URL"));
        assert!(!snippet.contains("AWIS_SCOPES"));
        assert!(snippet.ends_with("AWIS_CLIENT_SECRET=<secret shown on rotation>"));
    }
}
