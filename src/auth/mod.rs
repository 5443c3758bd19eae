// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Client-side authentication for the AWIS console.
//!
//! ## Auth Flow
//!
//! 1. Operator signs in with e-mail and password against
//!    `POST /api/v1/app/auth/login` (tenant and device headers attached)
//! 2. The returned access/refresh pair is persisted in the session store
//! 3. Every API call carries `Authorization: Bearer <access token>`
//! 4. On `401` the gateway exchanges the refresh token once
//!    (`POST /api/v1/app/auth/refresh`) and retries
//!
//! ## Claims
//!
//! Claims (`sub`, `roles`, `exp`) are decoded from the access token without
//! verifying its signature. They only drive client-side role gating; the
//! backend enforces authorization.

pub mod claims;
pub mod client;
pub mod context;
pub mod error;
pub mod roles;

pub use claims::AuthClaims;
pub use client::{AuthClient, LoginRequest, TokenPair};
pub use context::{AuthContext, AuthState};
pub use error::AccessError;
pub use roles::Role;
