//! State management module
//!
//! This module contains the timer record, the controller that owns the
//! collection, and the server-level state shared with the HTTP handlers.

pub mod timer;
pub mod grouping;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use timer::{Category, NewTimer, Timer, TimerId, TimerStatus, Transition};
pub use grouping::{group_by_category, GroupedView};
pub use controller::{CommandOutcome, Outcome, TimerController};
pub use app_state::AppState;
