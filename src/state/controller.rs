//! Authoritative in-memory timer collection

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use super::{group_by_category, GroupedView, NewTimer, Timer, TimerId, Transition};
use crate::{error::ValidationError, storage::PersistenceGateway};

/// What a transition command did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    /// The timer exists but the transition does not apply from its status
    Ignored,
    NotFound,
}

/// Result of a transition command
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub outcome: Outcome,
    /// The addressed timer after the command, if it exists
    pub timer: Option<Timer>,
    pub timers: Vec<Timer>,
}

/// Owns the timer collection and is the only place transitions happen
///
/// Every command and every tick holds the collection lock for its whole
/// read-modify-write and publishes while still holding it, so subscribers and
/// the persistence channel always end on the latest state.
#[derive(Debug)]
pub struct TimerController {
    timers: Mutex<Vec<Timer>>,
    ready: AtomicBool,
    persist_on_tick: bool,
    gateway: PersistenceGateway,
    /// Every change, ticks included, for rendering
    update_tx: watch::Sender<Vec<Timer>>,
    /// Changes that should reach the durable store
    persist_tx: watch::Sender<Vec<Timer>>,
    /// Names of completed timers, one message per completion
    completed_tx: broadcast::Sender<String>,
}

impl TimerController {
    pub fn new(gateway: PersistenceGateway, persist_on_tick: bool) -> Self {
        let (update_tx, _) = watch::channel(Vec::new());
        let (persist_tx, _) = watch::channel(Vec::new());
        let (completed_tx, _) = broadcast::channel(32);

        Self {
            timers: Mutex::new(Vec::new()),
            ready: AtomicBool::new(false),
            persist_on_tick,
            gateway,
            update_tx,
            persist_tx,
            completed_tx,
        }
    }

    fn lock_timers(&self) -> MutexGuard<'_, Vec<Timer>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push `timers` to subscribers, and to the store when `persist` is set
    fn publish(&self, timers: &[Timer], persist: bool) {
        self.update_tx.send_replace(timers.to_vec());
        if persist {
            self.persist_tx.send_replace(timers.to_vec());
        }
    }

    /// Populate the collection from the store and mark the controller ready
    pub async fn load(&self) {
        let gateway = self.gateway.clone();
        let loaded = match tokio::task::spawn_blocking(move || gateway.load()).await {
            Ok(timers) => timers,
            Err(e) => {
                error!("Timer load task failed: {}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let unique: Vec<Timer> = loaded
            .into_iter()
            .filter(|timer| {
                let fresh = seen.insert(timer.id.clone());
                if !fresh {
                    warn!("Dropping stored timer with duplicate id {}", timer.id);
                }
                fresh
            })
            .collect();

        let mut timers = self.lock_timers();
        *timers = unique;
        self.update_tx.send_replace(timers.clone());
        drop(timers);

        self.ready.store(true, Ordering::SeqCst);
        info!("Timer collection ready");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn persist_on_tick(&self) -> bool {
        self.persist_on_tick
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Validate input and append a new Pending timer
    pub fn create(
        &self,
        name: &str,
        duration_input: &str,
        category_input: &str,
    ) -> Result<Timer, ValidationError> {
        let request = match NewTimer::parse(name, duration_input, category_input) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected new timer '{}': {}", name, e);
                return Err(e);
            }
        };
        let timer = Timer::new(request);

        let mut timers = self.lock_timers();
        timers.push(timer.clone());
        self.publish(&timers, true);
        drop(timers);

        info!(
            "Created timer '{}' ({}, {}s) with id {}",
            timer.name, timer.category, timer.duration, timer.id
        );
        Ok(timer)
    }

    /// Locate `id`, apply `transition` and publish on success
    fn apply<F>(&self, action: &str, id: &TimerId, transition: F) -> CommandOutcome
    where
        F: FnOnce(&mut Timer) -> Transition,
    {
        let mut timers = self.lock_timers();

        let Some(index) = timers.iter().position(|timer| &timer.id == id) else {
            debug!("{} ignored: no timer with id {}", action, id);
            return CommandOutcome {
                outcome: Outcome::NotFound,
                timer: None,
                timers: timers.clone(),
            };
        };

        let outcome = match transition(&mut timers[index]) {
            Transition::Applied => Outcome::Applied,
            Transition::Ignored => Outcome::Ignored,
        };
        let updated = timers[index].clone();

        if outcome == Outcome::Applied {
            self.publish(&timers, true);
            info!("{} '{}' -> {}", action, updated.name, updated.status);
        } else {
            debug!("{} ignored for '{}' in status {}", action, updated.name, updated.status);
        }

        CommandOutcome {
            outcome,
            timer: Some(updated),
            timers: timers.clone(),
        }
    }

    pub fn start(&self, id: &TimerId) -> CommandOutcome {
        self.apply("start", id, Timer::start)
    }

    pub fn pause(&self, id: &TimerId) -> CommandOutcome {
        self.apply("pause", id, Timer::pause)
    }

    pub fn reset(&self, id: &TimerId) -> CommandOutcome {
        self.apply("reset", id, Timer::reset)
    }

    /// Mark a timer completed and announce its name
    pub fn complete(&self, id: &TimerId) -> CommandOutcome {
        let result = self.apply("complete", id, Timer::complete);

        if let (Outcome::Applied, Some(timer)) = (result.outcome, &result.timer) {
            if let Err(e) = self.completed_tx.send(timer.name.clone()) {
                debug!("No completion listeners for '{}': {}", timer.name, e);
            }
        }

        result
    }

    /// Advance every running timer by one second
    ///
    /// Returns how many timers moved.
    pub fn tick(&self) -> usize {
        let mut timers = self.lock_timers();
        let advanced = timers.iter_mut().map(Timer::tick).filter(|moved| *moved).count();
        if advanced > 0 {
            self.publish(&timers, self.persist_on_tick);
        }
        advanced
    }

    /// Queue the current collection for saving, ticks included
    ///
    /// Used before shutdown so elapsed time gained since the last command is
    /// not lost when ticks are not persisted.
    pub fn request_save(&self) {
        let timers = self.lock_timers();
        self.persist_tx.send_replace(timers.clone());
    }

    /// Save the current collection right away, on the calling thread
    ///
    /// Bypasses the writer task; returns whether the write succeeded.
    pub fn flush(&self) -> bool {
        let snapshot = self.snapshot();
        self.gateway.save(&snapshot)
    }

    pub fn snapshot(&self) -> Vec<Timer> {
        self.lock_timers().clone()
    }

    pub fn get(&self, id: &TimerId) -> Option<Timer> {
        self.lock_timers().iter().find(|timer| &timer.id == id).cloned()
    }

    pub fn grouped(&self) -> GroupedView {
        group_by_category(&self.lock_timers())
    }

    /// Collection updates, including every tick
    pub fn subscribe(&self) -> watch::Receiver<Vec<Timer>> {
        self.update_tx.subscribe()
    }

    /// One message per completion, carrying the timer name
    pub fn subscribe_completed(&self) -> broadcast::Receiver<String> {
        self.completed_tx.subscribe()
    }

    /// Snapshots that should be written to the store
    pub fn subscribe_persistence(&self) -> watch::Receiver<Vec<Timer>> {
        self.persist_tx.subscribe()
    }
}
