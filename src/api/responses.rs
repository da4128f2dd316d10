//! API request and response structures

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    state::{Category, CommandOutcome, GroupedView, Outcome, Timer, TimerStatus},
    utils::format_clock,
};

/// Body of POST /timers
///
/// `duration` is kept as raw JSON so a number, a numeric string and garbage
/// all reach the same validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration: serde_json::Value,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    Category::Study.to_string()
}

impl CreateTimerRequest {
    /// Duration as the text the user would have typed
    pub fn duration_input(&self) -> String {
        match &self.duration {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Pre-formatted `M:SS` values for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockDisplay {
    pub duration: String,
    pub elapsed: String,
    pub remaining: String,
}

/// A timer as rendered by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub live_remaining_time: u64,
    pub display: ClockDisplay,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        let live_remaining_time = timer.live_remaining_time();
        let display = ClockDisplay {
            duration: format_clock(timer.duration),
            elapsed: format_clock(timer.elapsed_time),
            remaining: format_clock(live_remaining_time),
        };
        Self {
            timer,
            live_remaining_time,
            display,
        }
    }
}

pub fn views(timers: Vec<Timer>) -> Vec<TimerView> {
    timers.into_iter().map(TimerView::from).collect()
}

/// Full collection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Vec<TimerView>,
}

/// Grouped view response, categories in first-appearance order
#[derive(Debug, Clone, Serialize)]
pub struct GroupedResponse {
    pub groups: IndexMap<Category, Vec<TimerView>>,
}

impl From<GroupedView> for GroupedResponse {
    fn from(groups: GroupedView) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(category, timers)| (category, views(timers)))
                .collect(),
        }
    }
}

/// Response for the transition endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
    pub timer: Option<TimerView>,
    /// Name to announce, present only on an applied completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    pub timers: Vec<TimerView>,
}

impl CommandResponse {
    pub fn new(result: CommandOutcome) -> Self {
        Self {
            outcome: result.outcome,
            timestamp: Utc::now(),
            timer: result.timer.map(TimerView::from),
            completed: None,
            timers: views(result.timers),
        }
    }

    pub fn with_completed(mut self, name: String) -> Self {
        self.completed = Some(name);
        self
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Count of timers per status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally(timers: &[Timer]) -> Self {
        let mut counts = Self::default();
        for timer in timers {
            match timer.status {
                TimerStatus::Pending => counts.pending += 1,
                TimerStatus::Running => counts.running += 1,
                TimerStatus::Paused => counts.paused += 1,
                TimerStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }
}

/// Server and collection status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub timer_count: usize,
    pub counts: StatusCounts,
    pub persist_on_tick: bool,
    pub store: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
