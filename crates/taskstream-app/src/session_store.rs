//! Durable session storage.
//!
//! The persisted layout is a single JSON object holding the `auth_user` key
//! with the serialized user as its value. A missing file or an unparseable
//! blob reads as "no session": a stale or corrupt session is never worth
//! failing startup over.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use taskstream_core::{Result, User};

/// Key under which the active session is stored.
pub const SESSION_KEY: &str = "auth_user";

/// Durable store for the single active session.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session; absence and corruption both read as `None`.
    ///
    /// # Errors
    /// Returns an error when the store itself cannot be read.
    fn load(&self) -> Result<Option<User>>;

    /// Persist `user` under the session key.
    ///
    /// # Errors
    /// Returns an error when the store cannot be written.
    fn save(&self, user: &User) -> Result<()>;

    /// Remove the session key.
    ///
    /// # Errors
    /// Returns an error when the store cannot be written.
    fn clear(&self) -> Result<()>;
}

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store writing to the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "session file is not valid JSON, treating as empty");
                Ok(Map::new())
            }
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<User>> {
        let entries = self.read_entries()?;
        let Some(value) = entries.get(SESSION_KEY) else {
            return Ok(None);
        };
        match serde_json::from_value(value.clone()) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "stored session does not parse, treating as absent");
                Ok(None)
            }
        }
    }

    fn save(&self, user: &User) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(SESSION_KEY.to_owned(), serde_json::to_value(user)?);
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(SESSION_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<User>> {
        (**self).load()
    }

    fn save(&self, user: &User) -> Result<()> {
        (**self).save(user)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Session store held entirely in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<User>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<User>> {
        Ok(guard(&self.slot).clone())
    }

    fn save(&self, user: &User) -> Result<()> {
        *guard(&self.slot) = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *guard(&self.slot) = None;
        Ok(())
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
