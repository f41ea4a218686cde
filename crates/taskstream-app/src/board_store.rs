//! Persistence for the task board between runs.
//!
//! Unlike the session blob, tasks are user data: a file that exists but does
//! not parse is surfaced as an error instead of being silently discarded.

use std::fs;
use std::io;
use std::path::PathBuf;

use taskstream_core::{Result, Task};

/// Durable store for the full task list.
pub trait BoardStore: Send + Sync {
    /// Load every persisted task; a store that was never written is empty.
    ///
    /// # Errors
    /// Returns an error when the store cannot be read or does not parse.
    fn load(&self) -> Result<Vec<Task>>;

    /// Replace the persisted task list.
    ///
    /// # Errors
    /// Returns an error when the store cannot be written.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Board store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileBoardStore {
    path: PathBuf,
}

impl FileBoardStore {
    /// Store writing to the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl BoardStore for FileBoardStore {
    fn load(&self) -> Result<Vec<Task>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(tasks)?)?;
        Ok(())
    }
}
