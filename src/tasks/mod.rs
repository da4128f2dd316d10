//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server.

pub mod ticker;
pub mod persistence_writer;

// Re-export main functions
pub use ticker::{spawn_ticker, TickerHandle, TICK_PERIOD};
pub use persistence_writer::{persistence_writer_task, spawn_persistence_writer, PersistenceWriter};
