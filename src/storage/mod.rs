//! Persistence module
//!
//! The whole timer collection is stored and retrieved as one unit. Backends
//! implement [`TimerStore`]; [`PersistenceGateway`] puts the "never fail the
//! caller" contract on top of any of them.

pub mod gateway;
pub mod json_file;
pub mod memory;

use crate::{error::PersistenceError, state::Timer};

pub use gateway::PersistenceGateway;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// A durable location holding the full, ordered timer collection
pub trait TimerStore: Send + Sync {
    /// Read the stored collection, `None` when nothing was ever written
    fn read(&self) -> Result<Option<Vec<Timer>>, PersistenceError>;

    /// Replace the stored collection with `timers`
    fn write(&self, timers: &[Timer]) -> Result<(), PersistenceError>;

    /// Human readable location, used in log lines
    fn describe(&self) -> String;
}
