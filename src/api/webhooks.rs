// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Webhook endpoints per tenant.
//!
//! Reads, updates and deletes pass the tenant as `?empresaId=` when given;
//! otherwise the backend falls back to the tenant header of the session.
//! Creation carries the tenant in the body only.
//!
//! Every tenant is expected to receive [`DEFAULT_EVENTS`] at
//! `https://{domain}/api/webhooks/progem`; [`provision_defaults`] creates the
//! endpoints that are missing.

use reqwest::Method;
use tracing::{debug, info};

use super::{decode_list, endpoints};
use crate::error::{ApiError, Error};
use crate::gateway::RequestGateway;
use crate::models::{normalize_domain, WebhookCreate, WebhookEndpoint, WebhookUpdate};

/// Events every tenant must be subscribed to.
pub const DEFAULT_EVENTS: [&str; 5] = [
    "invoice.paid",
    "invoice.refunded",
    "contract.activated",
    "contract.reactivated",
    "contract.canceled",
];

/// Path of the webhook receiver on the tenant's own site.
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/webhooks/progem";

/// Integration notes printed alongside the tenant's endpoints.
pub const GUIDE: &str = "\
Each endpoint validates the signature of every delivery with its own secret.
The company is identified by the X-Progem-ID header.
Recommended URL for the tenant: https://{tenant-domain}/api/webhooks/progem
Required events: invoice.paid, invoice.refunded, contract.activated, \
contract.reactivated, contract.canceled";

/// Default receiver URL for a tenant domain, `None` when the domain is blank.
pub fn default_url(domain: &str) -> Option<String> {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        return None;
    }
    Some(format!("https://{domain}{DEFAULT_WEBHOOK_PATH}"))
}

/// Description given to the endpoint provisioned for `event`.
pub fn default_description(event: &str) -> Option<&'static str> {
    match event {
        "invoice.paid" => Some("Endpoint de pagamento"),
        "invoice.refunded" => Some("Endpoint de estorno de pagamento"),
        "contract.activated" => Some("Endpoint de ativação de contrato"),
        "contract.reactivated" => Some("Endpoint de reativação de contrato"),
        "contract.canceled" => Some("Endpoint de cancelamento de contrato"),
        _ => None,
    }
}

/// Default events not delivered by any active endpoint.
///
/// An endpoint without an `ativo` flag counts as active. Event names are
/// compared trimmed.
pub fn missing_default_events(hooks: &[WebhookEndpoint]) -> Vec<&'static str> {
    DEFAULT_EVENTS
        .into_iter()
        .filter(|event| {
            !hooks.iter().any(|hook| {
                hook.active.unwrap_or(true) && hook.events.iter().any(|e| e.trim() == *event)
            })
        })
        .collect()
}

/// Create one endpoint per missing default event, pointing at the tenant's
/// default URL.
///
/// Fails before any call when `domain` is absent or blank. Returns the
/// created endpoints; empty when nothing was missing.
pub async fn provision_defaults(
    gateway: &RequestGateway,
    tenant_id: u64,
    domain: Option<&str>,
) -> Result<Vec<WebhookEndpoint>, Error> {
    let url = domain.and_then(default_url).ok_or_else(|| {
        ApiError::new(
            0,
            "Tenant domain not registered; set it to derive the default webhook URL",
        )
    })?;

    let existing = list(gateway, Some(tenant_id)).await?;
    let missing = missing_default_events(&existing);
    if missing.is_empty() {
        debug!(tenant_id, "Default webhook events already covered");
        return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(missing.len());
    for event in missing {
        let body = WebhookCreate {
            tenant_id,
            url: url.clone(),
            events: vec![event.to_string()],
            description: default_description(event).map(str::to_string),
            secret: None,
        };
        created.push(create(gateway, &body).await?);
    }
    info!(tenant_id, count = created.len(), "Default webhook endpoints provisioned");
    Ok(created)
}

pub async fn list(
    gateway: &RequestGateway,
    tenant_id: Option<u64>,
) -> Result<Vec<WebhookEndpoint>, Error> {
    let body = gateway
        .request(Method::GET, &endpoints::webhook_endpoints(tenant_id), None)
        .await?;
    decode_list(body)
}

pub async fn get(
    gateway: &RequestGateway,
    id: u64,
    tenant_id: Option<u64>,
) -> Result<WebhookEndpoint, Error> {
    gateway.get(&endpoints::webhook_endpoint(id, tenant_id)).await
}

pub async fn create(
    gateway: &RequestGateway,
    body: &WebhookCreate,
) -> Result<WebhookEndpoint, Error> {
    let created: WebhookEndpoint = gateway
        .post(&endpoints::webhook_endpoints(None), Some(body))
        .await?;
    info!(id = created.id, tenant_id = body.tenant_id, "Webhook endpoint created");
    Ok(created)
}

pub async fn update(
    gateway: &RequestGateway,
    id: u64,
    body: &WebhookUpdate,
) -> Result<WebhookEndpoint, Error> {
    gateway
        .put(&endpoints::webhook_endpoint(id, Some(body.tenant_id)), Some(body))
        .await
}

pub async fn delete(gateway: &RequestGateway, id: u64, tenant_id: Option<u64>) -> Result<(), Error> {
    gateway
        .request(Method::DELETE, &endpoints::webhook_endpoint(id, tenant_id), None)
        .await?;
    info!(id, "Webhook endpoint deleted");
    Ok(())
}
