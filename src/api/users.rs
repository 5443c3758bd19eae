// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin users and role assignment.

use reqwest::Method;
use serde_json::json;
use tracing::info;

use super::endpoints::{self, UserQuery};
use crate::auth::Role;
use crate::error::Error;
use crate::gateway::RequestGateway;
use crate::models::{AdminUser, Page, UserRoles};

pub async fn list(gateway: &RequestGateway, query: &UserQuery) -> Result<Page<AdminUser>, Error> {
    gateway.get(&endpoints::admin_users(query)).await
}

pub async fn roles(gateway: &RequestGateway, user_id: u64) -> Result<UserRoles, Error> {
    let roles: UserRoles = gateway.get(&endpoints::admin_user_roles(user_id)).await?;
    Ok(roles.dedup())
}

/// Add `role` and return the resulting role set.
pub async fn grant(gateway: &RequestGateway, user_id: u64, role: Role) -> Result<UserRoles, Error> {
    gateway
        .request(
            Method::POST,
            &endpoints::admin_user_role(user_id, role),
            Some(json!({})),
        )
        .await?;
    info!(user_id, role = %role, "Role granted");
    roles(gateway, user_id).await
}

/// Remove `role` and return the resulting role set.
pub async fn revoke(gateway: &RequestGateway, user_id: u64, role: Role) -> Result<UserRoles, Error> {
    gateway
        .request(Method::DELETE, &endpoints::admin_user_role(user_id, role), None)
        .await?;
    info!(user_id, role = %role, "Role revoked");
    roles(gateway, user_id).await
}
