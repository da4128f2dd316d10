//! Once-per-second driver for running timers

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::state::TimerController;

/// Cadence at which running timers gain one second
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the ticker task; dropping the handle stops the ticks
#[derive(Debug)]
pub struct TickerHandle {
    handle: JoinHandle<()>,
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Ticker stopped");
    }
}

/// Start ticking `controller` every `period`
pub fn spawn_ticker(controller: Arc<TimerController>, period: Duration) -> TickerHandle {
    TickerHandle {
        handle: tokio::spawn(ticker_task(controller, period)),
    }
}

async fn ticker_task(controller: Arc<TimerController>, period: Duration) {
    info!("Starting ticker task ({:?} period)", period);

    let mut interval = interval(period);
    // A late tick is applied once, never as a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let advanced = controller.tick();
        if advanced > 0 {
            debug!("Tick advanced {} running timers", advanced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, PersistenceGateway};

    fn running_controller() -> (Arc<TimerController>, crate::state::TimerId) {
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        let controller = Arc::new(TimerController::new(gateway, false));
        let id = controller.create("Focus", "600", "Study").unwrap().id;
        controller.start(&id);
        (controller, id)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (controller, id) = running_controller();
        let _ticker = spawn_ticker(Arc::clone(&controller), TICK_PERIOD);

        tokio::time::sleep(Duration::from_millis(5_500)).await;

        assert_eq!(controller.get(&id).unwrap().elapsed_time, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_ticks() {
        let (controller, id) = running_controller();
        let ticker = spawn_ticker(Arc::clone(&controller), TICK_PERIOD);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        drop(ticker);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(controller.get(&id).unwrap().elapsed_time, 2);
    }
}
