// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bearer-token session and the unauthorized signal.
//!
//! The token lives behind a [`TokenStore`]; nothing reads it from ambient
//! global state. A 401 seen by the API client is delivered to the observers
//! registered with [`Session::on_unauthorized`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub trait TokenStore: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn write(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Keeps the token in a small JSON file, e.g. under the platform config dir.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(s) if !s.token.is_empty() => Some(s.token),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string(&StoredSession {
            token: token.to_string(),
        })?;
        fs::write(&self.path, body)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// What the API client saw when it got a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized {
    pub path: String,
    pub message: Option<String>,
}

type Observer = Arc<dyn Fn(&Unauthorized) + Send + Sync>;

pub struct Session {
    store: Box<dyn TokenStore>,
    observers: RwLock<Vec<Observer>>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Session {
            store: Box::new(store),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn token(&self) -> Option<String> {
        self.store.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) -> io::Result<()> {
        debug!("storing session token");
        self.store.write(token)
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
    }

    pub fn on_unauthorized<F>(&self, observer: F)
    where
        F: Fn(&Unauthorized) + Send + Sync + 'static,
    {
        self.observers
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .push(Arc::new(observer));
    }

    /// Drops the credential and tells every observer, synchronously.
    pub fn signal_unauthorized(&self, event: Unauthorized) {
        info!(path = %event.path, "unauthorized; clearing session");
        self.clear();
        // snapshot so observers may register further observers
        let observers: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        for observer in observers {
            observer(&event);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.read(), None);
        store.write("abc").unwrap();
        assert_eq!(store.read().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.read(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn unauthorized_clears_and_notifies() {
        let session = Session::new(MemoryTokenStore::with_token("t"));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        session.on_unauthorized(move |ev| {
            assert_eq!(ev.path, "/api/expenses");
            counter.fetch_add(1, Ordering::SeqCst);
        });
        session.signal_unauthorized(Unauthorized {
            path: "/api/expenses".into(),
            message: None,
        });
        assert!(!session.is_authenticated());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
