// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Storage
//!
//! Durable storage for the console credential bundle: base URL, tenant id,
//! device id and the access/refresh token pair.
//!
//! ## Normalization
//!
//! Every write (and every read) normalizes the record:
//!
//! - strings are trimmed
//! - trailing slashes are removed from the base URL
//! - a `Bearer ` prefix is stripped from both tokens
//! - the tenant id is coerced to a positive integer, defaulting to `128`
//!
//! Reading never fails: a missing or corrupt record yields the default
//! session.

pub mod model;
pub mod store;

pub use model::{normalize_base_url, strip_bearer, Session, DEFAULT_TENANT_ID};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
