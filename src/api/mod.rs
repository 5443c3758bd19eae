// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # AWIS Admin API
//!
//! Typed operations over the [`RequestGateway`]. Every call goes through the
//! gateway, so credentials, tenant headers and token refresh are handled
//! there.
//!
//! ## Areas
//!
//! | Module | Backend prefix |
//! |--------|----------------|
//! | [`clients`] | `/api/v1/api-clients` |
//! | [`webhooks`] | `/api/v1/webhooks/endpoints` |
//! | [`users`] | `/api/v1/app/admin/users` |
//!
//! [`RequestGateway`]: crate::gateway::RequestGateway

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

pub mod clients;
pub mod endpoints;
pub mod users;
pub mod webhooks;

pub use endpoints::UserQuery;

/// Decode a listing body; anything that is not a JSON array is an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(body: Option<Value>) -> Result<Vec<T>, Error> {
    match body {
        Some(Value::Array(items)) => {
            serde_json::from_value(Value::Array(items)).map_err(Error::Decode)
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_list_treats_non_arrays_as_empty() {
        let none: Vec<u64> = decode_list(None).unwrap();
        assert!(none.is_empty());

        let object: Vec<u64> = decode_list(Some(json!({ "content": [1] }))).unwrap();
        assert!(object.is_empty());

        let items: Vec<u64> = decode_list(Some(json!([1, 2]))).unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn decode_list_reports_bad_items() {
        let err = decode_list::<u64>(Some(json!(["x"]))).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
