// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth context: the current session, its claims, and role gating.
//!
//! The session store is the single source of truth. Every mutation loads the
//! stored session, applies the change and saves it back, so the gateway sees
//! the same credentials on its next call.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::claims::AuthClaims;
use super::client::{AuthClient, LoginRequest};
use super::error::AccessError;
use super::roles::Role;
use crate::error::Error;
use crate::session::{normalize_base_url, Session, SessionStore, StoreError};

/// Snapshot of the signed-in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub session: Session,
    pub claims: Option<AuthClaims>,
    pub is_authed: bool,
}

impl AuthState {
    pub fn from_session(session: Session) -> Self {
        let claims = if session.has_access_token() {
            AuthClaims::decode(&session.access_token)
        } else {
            None
        };
        let expired = claims.as_ref().is_some_and(AuthClaims::is_expired);

        Self {
            is_authed: session.has_access_token() && !expired,
            session,
            claims,
        }
    }

    /// Roles carried by the token, empty when signed out.
    pub fn roles(&self) -> Vec<String> {
        self.claims
            .as_ref()
            .map(|c| c.roles.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Reads and mutates the persisted session on behalf of the console.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn SessionStore>,
    auth: AuthClient,
}

impl AuthContext {
    pub fn new(store: Arc<dyn SessionStore>, auth: AuthClient) -> Self {
        Self { store, auth }
    }

    pub fn session(&self) -> Session {
        self.store.load()
    }

    pub fn state(&self) -> AuthState {
        AuthState::from_session(self.store.load())
    }

    pub fn set_base_url(&self, base_url: &str) -> Result<Session, StoreError> {
        self.update(|s| s.base_url = base_url.to_string())
    }

    pub fn set_tenant_id(&self, tenant_id: u64) -> Result<Session, StoreError> {
        self.update(|s| s.tenant_id = tenant_id)
    }

    pub fn set_device_id(&self, device_id: &str) -> Result<Session, StoreError> {
        self.update(|s| s.device_id = device_id.to_string())
    }

    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> Result<Session, StoreError> {
        self.update(|s| {
            s.access_token = access_token.to_string();
            s.refresh_token = refresh_token.to_string();
        })
    }

    /// Replace the whole session.
    pub fn login(&self, session: Session) -> Result<Session, StoreError> {
        self.commit(session)
    }

    /// Drop both tokens; base URL, tenant and device are kept.
    pub fn logout(&self) -> Result<Session, StoreError> {
        let next = self.store.load().signed_out();
        info!("Signed out");
        self.commit(next)
    }

    /// Sign in against the backend and persist the resulting session.
    ///
    /// Reuses the stored device id, or generates one on first sign-in.
    pub async fn sign_in(
        &self,
        base_url: &str,
        tenant_id: u64,
        identifier: &str,
        password: &str,
    ) -> Result<AuthState, Error> {
        let current = self.store.load();
        let device_id = if current.device_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            current.device_id
        };
        let base_url = normalize_base_url(base_url);

        let tokens = self
            .auth
            .login(LoginRequest {
                base_url: &base_url,
                tenant_id,
                device_id: &device_id,
                identifier,
                password,
            })
            .await?;

        let session = self.commit(Session {
            base_url,
            tenant_id,
            device_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.unwrap_or_default(),
        })?;

        let state = AuthState::from_session(session);
        info!(
            tenant_id = state.session.tenant_id,
            subject = state.claims.as_ref().and_then(|c| c.subject.as_deref()),
            "Signed in"
        );
        Ok(state)
    }

    /// Claims of the signed-in user, provided they carry `role`.
    pub fn require_role(&self, role: Role) -> Result<AuthClaims, AccessError> {
        self.require_any_role(&[role])
    }

    /// Claims of the signed-in user, provided they carry one of `roles`.
    pub fn require_any_role(&self, roles: &[Role]) -> Result<AuthClaims, AccessError> {
        let state = self.state();
        if !state.is_authed {
            return Err(AccessError::NotAuthenticated);
        }

        let claims = state.claims.unwrap_or_default();
        if claims.has_any_role(roles) {
            return Ok(claims);
        }

        Err(AccessError::MissingRole {
            required: roles.to_vec(),
            current: claims.roles.iter().cloned().collect(),
            subject: claims.subject,
        })
    }

    fn update(&self, change: impl FnOnce(&mut Session)) -> Result<Session, StoreError> {
        let mut session = self.store.load();
        change(&mut session);
        self.commit(session)
    }

    /// Save, then return the session as it was stored.
    fn commit(&self, session: Session) -> Result<Session, StoreError> {
        self.store.save(&session)?;
        Ok(session.normalized())
    }
}
