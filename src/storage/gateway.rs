//! Load/save wrapper that degrades instead of failing

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::TimerStore;
use crate::state::Timer;

/// Front door to the timer store
///
/// `save` and `load` never return errors: a failed save is logged and the
/// in-memory collection stays authoritative, a failed load means "no history".
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn TimerStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn TimerStore>) -> Self {
        Self { store }
    }

    /// Overwrite the stored collection; returns whether the write succeeded
    pub fn save(&self, timers: &[Timer]) -> bool {
        match self.store.write(timers) {
            Ok(()) => {
                debug!("Saved {} timers to {}", timers.len(), self.store.describe());
                true
            }
            Err(e) => {
                error!("Error saving timers to {}: {}", self.store.describe(), e);
                false
            }
        }
    }

    pub fn load(&self) -> Vec<Timer> {
        match self.store.read() {
            Ok(Some(timers)) => {
                info!("Loaded {} timers from {}", timers.len(), self.store.describe());
                timers
            }
            Ok(None) => {
                info!("No saved timers at {}, starting empty", self.store.describe());
                Vec::new()
            }
            Err(e) => {
                warn!("Error loading timers from {}: {}", self.store.describe(), e);
                Vec::new()
            }
        }
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("store", &self.store.describe())
            .finish()
    }
}
