//! Timer Keeper - named, categorized activity timers with persisted history
//!
//! This library provides the timer lifecycle (start, pause, reset, complete),
//! a once-per-second ticker for running timers, and whole-collection
//! persistence, behind a small local HTTP command API.

pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PersistenceError, ValidationError};
pub use state::{AppState, Category, Timer, TimerController, TimerId, TimerStatus};
pub use storage::{JsonFileStore, MemoryStore, PersistenceGateway, TimerStore};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
