//! Timer record and its status transitions

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque, immutable timer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    /// Generate a fresh identifier for a newly created timer
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TimerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TimerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    Pending,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Pending => "Pending",
            TimerStatus::Running => "Running",
            TimerStatus::Paused => "Paused",
            TimerStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping label chosen when the timer is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Workout,
    Study,
    Break,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Workout, Category::Study, Category::Break];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Workout => "Workout",
            Category::Study => "Study",
            Category::Break => "Break",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCategory(trimmed.to_string()))
    }
}

/// Whether a transition changed the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The timer was in a state the transition does not leave from
    Ignored,
}

/// A validated "add timer" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimer {
    pub name: String,
    pub duration: u64,
    pub category: Category,
}

impl NewTimer {
    /// Validate raw user input
    ///
    /// `duration_input` is the text the user typed; it must be a whole,
    /// positive number of seconds.
    pub fn parse(
        name: &str,
        duration_input: &str,
        category_input: &str,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let raw = duration_input.trim();
        let seconds: i64 = raw
            .parse()
            .map_err(|_| ValidationError::NotANumber(raw.to_string()))?;
        if seconds <= 0 {
            return Err(ValidationError::NonPositiveDuration(seconds));
        }

        Ok(Self {
            name: name.to_string(),
            // Positive i64 always fits
            duration: seconds as u64,
            category: category_input.parse()?,
        })
    }
}

/// A named, categorized activity timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    pub duration: u64,
    pub category: Category,
    /// Seconds left as of the last pause or reset; not refreshed while running
    pub remaining_time: u64,
    pub elapsed_time: u64,
    pub status: TimerStatus,
}

impl Timer {
    pub fn new(request: NewTimer) -> Self {
        Self {
            id: TimerId::generate(),
            name: request.name,
            duration: request.duration,
            category: request.category,
            remaining_time: request.duration,
            elapsed_time: 0,
            status: TimerStatus::Pending,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Seconds left right now, accounting for a run in progress
    pub fn live_remaining_time(&self) -> u64 {
        self.duration.saturating_sub(self.elapsed_time)
    }

    /// Pending or Paused -> Running; elapsed time carries over
    pub fn start(&mut self) -> Transition {
        match self.status {
            TimerStatus::Pending | TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                Transition::Applied
            }
            TimerStatus::Running | TimerStatus::Completed => Transition::Ignored,
        }
    }

    /// Running -> Paused, snapshotting the remaining time
    pub fn pause(&mut self) -> Transition {
        if self.status != TimerStatus::Running {
            return Transition::Ignored;
        }
        self.status = TimerStatus::Paused;
        self.remaining_time = self.live_remaining_time();
        Transition::Applied
    }

    pub fn reset(&mut self) -> Transition {
        self.status = TimerStatus::Pending;
        self.elapsed_time = 0;
        self.remaining_time = self.duration;
        Transition::Applied
    }

    /// Any state -> Completed; time counters are left as they are
    pub fn complete(&mut self) -> Transition {
        self.status = TimerStatus::Completed;
        Transition::Applied
    }

    /// Advance a running timer by one second
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.elapsed_time = self.elapsed_time.saturating_add(1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(duration: u64) -> Timer {
        Timer::new(NewTimer {
            name: "Reading".to_string(),
            duration,
            category: Category::Study,
        })
    }

    #[test]
    fn new_timer_starts_pending_with_full_time() {
        let t = timer(90);
        assert_eq!(t.status, TimerStatus::Pending);
        assert_eq!(t.elapsed_time, 0);
        assert_eq!(t.remaining_time, 90);
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(timer(10).id, timer(10).id);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            NewTimer::parse("", "10", "Study"),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            NewTimer::parse("   ", "10", "Study"),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            NewTimer::parse("X", "0", "Study"),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert_eq!(
            NewTimer::parse("X", "-5", "Study"),
            Err(ValidationError::NonPositiveDuration(-5))
        );
        assert_eq!(
            NewTimer::parse("X", "abc", "Study"),
            Err(ValidationError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            NewTimer::parse("X", "2.5", "Study"),
            Err(ValidationError::NotANumber("2.5".to_string()))
        );
        assert_eq!(
            NewTimer::parse("X", "10", "Nap"),
            Err(ValidationError::UnknownCategory("Nap".to_string()))
        );
    }

    #[test]
    fn parse_accepts_padded_input() {
        let request = NewTimer::parse("Squats", " 45 ", "workout").unwrap();
        assert_eq!(request.duration, 45);
        assert_eq!(request.category, Category::Workout);
    }

    #[test]
    fn start_resumes_without_clearing_elapsed() {
        let mut t = timer(60);
        assert_eq!(t.start(), Transition::Applied);
        t.tick();
        t.tick();
        t.pause();
        assert_eq!(t.start(), Transition::Applied);
        assert_eq!(t.elapsed_time, 2);
        assert_eq!(t.status, TimerStatus::Running);
    }

    #[test]
    fn start_is_ignored_when_running_or_completed() {
        let mut t = timer(60);
        t.start();
        assert_eq!(t.start(), Transition::Ignored);

        t.complete();
        assert_eq!(t.start(), Transition::Ignored);
        assert_eq!(t.status, TimerStatus::Completed);
    }

    #[test]
    fn pause_snapshots_remaining_time() {
        let mut t = timer(60);
        t.start();
        for _ in 0..5 {
            t.tick();
        }
        // Stale until the run stops
        assert_eq!(t.remaining_time, 60);
        assert_eq!(t.live_remaining_time(), 55);

        assert_eq!(t.pause(), Transition::Applied);
        assert_eq!(t.status, TimerStatus::Paused);
        assert_eq!(t.elapsed_time, 5);
        assert_eq!(t.remaining_time, 55);
    }

    #[test]
    fn pause_outside_running_is_ignored() {
        let mut t = timer(60);
        assert_eq!(t.pause(), Transition::Ignored);
        assert_eq!(t.status, TimerStatus::Pending);
    }

    #[test]
    fn remaining_time_never_goes_negative() {
        let mut t = timer(2);
        t.start();
        for _ in 0..4 {
            t.tick();
        }
        t.pause();
        assert_eq!(t.elapsed_time, 4);
        assert_eq!(t.remaining_time, 0);
    }

    #[test]
    fn reset_returns_to_baseline_from_every_state() {
        let setups: [fn(&mut Timer); 4] = [
            |_| {},
            |t| {
                t.start();
                t.tick();
            },
            |t| {
                t.start();
                t.tick();
                t.pause();
            },
            |t| {
                t.start();
                t.tick();
                t.complete();
            },
        ];
        for setup in setups {
            let mut t = timer(30);
            setup(&mut t);
            assert_eq!(t.reset(), Transition::Applied);
            assert_eq!(t.status, TimerStatus::Pending);
            assert_eq!(t.elapsed_time, 0);
            assert_eq!(t.remaining_time, 30);
        }
    }

    #[test]
    fn complete_keeps_time_counters() {
        let mut t = timer(30);
        t.start();
        t.tick();
        assert_eq!(t.complete(), Transition::Applied);
        assert_eq!(t.complete(), Transition::Applied);
        assert_eq!(t.status, TimerStatus::Completed);
        assert_eq!(t.elapsed_time, 1);
        assert_eq!(t.remaining_time, 30);
    }

    #[test]
    fn tick_only_moves_running_timers() {
        let mut t = timer(30);
        assert!(!t.tick());
        t.start();
        assert!(t.tick());
        t.pause();
        assert!(!t.tick());
        assert_eq!(t.elapsed_time, 1);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let mut t = timer(25);
        t.id = TimerId::from("2024-05-01T10:00:00.000Z");
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "2024-05-01T10:00:00.000Z",
                "name": "Reading",
                "duration": 25,
                "category": "Study",
                "remainingTime": 25,
                "elapsedTime": 0,
                "status": "Pending",
            })
        );
    }
}
