//! JSON file backend

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::TimerStore;
use crate::{error::PersistenceError, state::Timer};

/// File name of the collection inside the data directory
pub const TIMERS_FILE: &str = "timers.json";

/// Stores the collection as a JSON array in a single file
///
/// Writes land in a sibling `.tmp` file first and are renamed over the
/// target, so a reader sees either the old or the new blob.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the well-known file inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TIMERS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, path: &Path, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl TimerStore for JsonFileStore {
    fn read(&self) -> Result<Option<Vec<Timer>>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(&self.path, e)),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write(&self, timers: &[Timer]) -> Result<(), PersistenceError> {
        let text = serde_json::to_string_pretty(timers)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, text).map_err(|e| self.io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
