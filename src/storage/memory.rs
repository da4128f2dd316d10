//! In-process backend for tests and ephemeral runs

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use super::TimerStore;
use crate::{error::PersistenceError, state::Timer};

/// Keeps the serialized collection in memory
///
/// The blob is kept as JSON text so reads go through the same decoding path
/// as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an arbitrary stored blob
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TimerStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<Timer>>, PersistenceError> {
        let blob = self.blob.lock().unwrap_or_else(PoisonError::into_inner);
        match blob.as_deref() {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, timers: &[Timer]) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "memory store is set to fail writes".to_string(),
            ));
        }
        let text = serde_json::to_string(timers)?;
        *self.blob.lock().unwrap_or_else(PoisonError::into_inner) = Some(text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
