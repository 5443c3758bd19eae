// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store implementations.
//!
//! The file store keeps one JSON document on disk and replaces it atomically
//! (temp file + rename). The memory store holds the same JSON text in
//! process, which keeps both paths going through the same lenient parser.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

use super::model::Session;

/// Session file location relative to the home directory.
const SESSION_FILE_PATH: &str = ".awis/console_session.json";

/// Error type for session persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("session serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine home directory for the session file")]
    NoHomeDir,
}

/// Durable storage for the current [`Session`].
///
/// `load` never fails; it returns the default session when nothing usable is
/// stored. `save` normalizes before writing.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;

    fn save(&self, session: &Session) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

fn parse_stored(raw: &str, origin: &str) -> Session {
    if raw.trim().is_empty() {
        return Session::default();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Session::from_stored(&value),
        Err(e) => {
            warn!(origin = %origin, error = %e, "Stored session is corrupt; using defaults");
            Session::default()
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// JSON file backed session store.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `~/.awis/console_session.json`.
    pub fn in_home_dir() -> Result<Self, StoreError> {
        Self::default_path()
            .map(Self::new)
            .ok_or(StoreError::NoHomeDir)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SESSION_FILE_PATH))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_stored(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Session::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                Session::default()
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let session = session.clone().normalized();
        let _guard = lock(&self.write_lock);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &session)?;
            writer.flush()?;
        }

        // Tokens live in this file: owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = lock(&self.write_lock);
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process session store holding the serialized record.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw stored text (which may be corrupt).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Seed the store with a session, normalized as by `save`.
    pub fn with_session(session: &Session) -> Result<Self, StoreError> {
        let store = Self::new();
        store.save(session)?;
        Ok(store)
    }

    /// Raw stored text, if any.
    pub fn raw(&self) -> Option<String> {
        lock(&self.raw).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        match lock(&self.raw).as_deref() {
            Some(raw) => parse_stored(raw, "memory"),
            None => Session::default(),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&session.clone().normalized())?;
        *lock(&self.raw) = Some(serialized);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *lock(&self.raw) = None;
        Ok(())
    }
}
