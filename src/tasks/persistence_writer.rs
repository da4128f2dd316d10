//! Single writer that drains save requests

use std::sync::Arc;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
};
use tracing::{error, info, warn};

use crate::{
    state::{Timer, TimerController},
    storage::PersistenceGateway,
};

/// Handle to the running writer task
#[derive(Debug)]
pub struct PersistenceWriter {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl PersistenceWriter {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Save any pending snapshot, then stop the writer
    pub async fn shutdown(self) {
        // The writer may already be gone if its channel closed
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            warn!("Persistence writer ended abnormally: {}", e);
        }
    }
}

/// Spawn the writer for `controller`'s persistence channel
pub fn spawn_persistence_writer(controller: &Arc<TimerController>) -> PersistenceWriter {
    let gateway = controller.gateway().clone();
    let requests = controller.subscribe_persistence();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    PersistenceWriter {
        handle: tokio::spawn(persistence_writer_task(gateway, requests, shutdown_rx)),
        shutdown_tx,
    }
}

/// Save the newest requested snapshot until shutdown or the channel closes
///
/// Only one save is in flight at a time. Snapshots published while a save is
/// running collapse into the latest one.
pub async fn persistence_writer_task(
    gateway: PersistenceGateway,
    mut requests: watch::Receiver<Vec<Timer>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    info!("Starting persistence writer for {}", gateway.describe());

    loop {
        tokio::select! {
            changed = requests.changed() => {
                if changed.is_err() {
                    info!("Persistence channel closed, writer stopping");
                    return;
                }
                save_latest(&gateway, &mut requests).await;
            }
            _ = &mut shutdown => {
                if requests.has_changed().unwrap_or(false) {
                    save_latest(&gateway, &mut requests).await;
                }
                info!("Persistence writer stopped");
                return;
            }
        }
    }
}

async fn save_latest(gateway: &PersistenceGateway, requests: &mut watch::Receiver<Vec<Timer>>) {
    let snapshot = requests.borrow_and_update().clone();
    let writer = gateway.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || writer.save(&snapshot)).await {
        error!("Save task failed: {}", e);
    }
}
