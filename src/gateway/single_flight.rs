// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-flight coordination for token refresh.
//!
//! At most one refresh runs at a time. Callers that discover an expired
//! token while a refresh is pending attach to it and receive the same
//! outcome. The slot is cleared once the refresh settles, success or not.
//!
//! The slot lock is synchronous and never held across an await: attaching
//! and clearing happen between suspension points.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use crate::auth::TokenPair;
use crate::error::Error;

/// Outcome shared by every caller attached to one refresh.
pub type RefreshOutcome = Result<TokenPair, Arc<Error>>;

type Flight = Arc<OnceCell<RefreshOutcome>>;

/// Handle to the in-flight refresh, if any.
#[derive(Debug, Default)]
pub struct PendingRefresh {
    slot: Mutex<Option<Flight>>,
}

impl PendingRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    /// Join the pending refresh, or start one with `refresh`.
    ///
    /// `refresh` only runs when no other caller's refresh is in flight. If
    /// the caller driving the refresh is dropped mid-flight, the next waiter
    /// runs its own `refresh` instead.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenPair, Error>>,
    {
        let flight = self.attach();
        let outcome = flight
            .get_or_init(|| async move { refresh().await.map_err(Arc::new) })
            .await
            .clone();
        self.settle(&flight);
        outcome
    }

    fn attach(&self) -> Flight {
        self.lock()
            .get_or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    fn settle(&self, flight: &Flight) {
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, flight)) {
            *slot = None;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Flight>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
