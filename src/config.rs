// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`ConsoleConfig`] assembled
//! from them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AWIS_API_BASE_URL` | Base URL used when the session has none | Unset |
//! | `AWIS_SESSION_PATH` | Session file location | `~/.awis/console_session.json` |
//! | `AWIS_HTTP_TIMEOUT_SECS` | Timeout applied by the HTTP client | Unset (no timeout) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::error::Error;
use crate::logging::LogFormat;
use crate::session::{FileSessionStore, StoreError};

/// Environment variable for the fallback API base URL.
pub const API_BASE_URL_ENV: &str = "AWIS_API_BASE_URL";

/// Environment variable overriding the session file path.
///
/// # Default
/// `~/.awis/console_session.json`
pub const SESSION_PATH_ENV: &str = "AWIS_SESSION_PATH";

/// Environment variable for the HTTP client timeout, in whole seconds.
pub const HTTP_TIMEOUT_SECS_ENV: &str = "AWIS_HTTP_TIMEOUT_SECS";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Console settings read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub default_base_url: Option<String>,
    pub session_path: Option<PathBuf>,
    pub http_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_optional)
    }

    /// Build from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let http_timeout = lookup(HTTP_TIMEOUT_SECS_ENV).and_then(|raw| match raw.parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                warn!(value = %raw, "Ignoring invalid AWIS_HTTP_TIMEOUT_SECS");
                None
            }
        });

        Self {
            default_base_url: lookup(API_BASE_URL_ENV),
            session_path: lookup(SESSION_PATH_ENV).map(PathBuf::from),
            http_timeout,
            log_format: lookup(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// HTTP client shared by the gateway and the auth client.
    pub fn http_client(&self) -> Result<Client, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.http_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// File store at the configured path, or the default one in the home
    /// directory.
    pub fn session_store(&self) -> Result<Arc<FileSessionStore>, StoreError> {
        let store = match &self.session_path {
            Some(path) => FileSessionStore::new(path.clone()),
            None => FileSessionStore::in_home_dir()?,
        };
        Ok(Arc::new(store))
    }
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_variables() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            (API_BASE_URL_ENV, "https://api.awis.example/"),
            (SESSION_PATH_ENV, "/tmp/awis/session.json"),
            (HTTP_TIMEOUT_SECS_ENV, "30"),
            (LOG_FORMAT_ENV, "json"),
        ]));

        assert_eq!(
            config.default_base_url.as_deref(),
            Some("https://api.awis.example/")
        );
        assert_eq!(
            config.session_path,
            Some(PathBuf::from("/tmp/awis/session.json"))
        );
        assert_eq!(config.http_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_or_zero_timeout_means_none() {
        let config = ConsoleConfig::from_lookup(lookup(&[(HTTP_TIMEOUT_SECS_ENV, "soon")]));
        assert!(config.http_timeout.is_none());

        let config = ConsoleConfig::from_lookup(lookup(&[(HTTP_TIMEOUT_SECS_ENV, "0")]));
        assert!(config.http_timeout.is_none());
    }

    #[test]
    fn session_store_uses_configured_path() {
        let config = ConsoleConfig {
            session_path: Some(PathBuf::from("/tmp/awis-test/session.json")),
            ..ConsoleConfig::default()
        };
        let store = config.session_store().unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/awis-test/session.json"));
    }

    #[test]
    fn http_client_builds_with_timeout() {
        let config = ConsoleConfig {
            http_timeout: Some(Duration::from_secs(5)),
            ..ConsoleConfig::default()
        };
        assert!(config.http_client().is_ok());
    }
}
