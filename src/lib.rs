// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AWIS Console - administrative client for the AWIS backend
//!
//! This crate provides an authenticated HTTP client for the AWIS admin API
//! with single-flight token refresh, plus typed operations for API clients,
//! webhook endpoints and user roles.
//!
//! ## Modules
//!
//! - `gateway` - Request gateway with one shared token refresh
//! - `session` - Persisted credentials (file or in-memory)
//! - `auth` - Login, refresh, claims and role gating
//! - `api` - Endpoint paths and typed operations
//! - `models` - Request and response bodies

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod models;
pub mod session;

#[cfg(test)]
mod test_support;
