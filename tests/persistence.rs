//! History survives a restart through the JSON file store

use std::sync::Arc;

use timer_keeper::{
    tasks::spawn_persistence_writer, JsonFileStore, PersistenceGateway, TimerController,
    TimerStatus, TimerStore,
};

fn controller_at(dir: &std::path::Path, persist_on_tick: bool) -> Arc<TimerController> {
    let store = Arc::new(JsonFileStore::in_dir(dir));
    Arc::new(TimerController::new(
        PersistenceGateway::new(store),
        persist_on_tick,
    ))
}

#[tokio::test]
async fn collection_is_restored_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = controller_at(dir.path(), false);
    first.load().await;
    let writer = spawn_persistence_writer(&first);
    let run = first.create("Run", "600", "Workout").unwrap().id;
    first.create("Read", "1500", "Study").unwrap();
    first.start(&run);
    for _ in 0..3 {
        first.tick();
    }
    first.pause(&run);
    let before = first.snapshot();
    writer.shutdown().await;

    let second = controller_at(dir.path(), false);
    second.load().await;

    assert_eq!(second.snapshot(), before);
    let restored = second.get(&run).unwrap();
    assert_eq!(restored.status, TimerStatus::Paused);
    assert_eq!(restored.elapsed_time, 3);
    assert_eq!(restored.remaining_time, 597);
}

#[tokio::test]
async fn running_timer_keeps_ticks_saved_at_shutdown() {
    let dir = tempfile::tempdir().unwrap();

    let first = controller_at(dir.path(), false);
    first.load().await;
    let writer = spawn_persistence_writer(&first);
    let id = first.create("Focus", "60", "Study").unwrap().id;
    first.start(&id);
    first.tick();
    first.tick();
    first.request_save();
    writer.shutdown().await;

    let second = controller_at(dir.path(), false);
    second.load().await;
    let restored = second.get(&id).unwrap();
    assert_eq!(restored.status, TimerStatus::Running);
    assert_eq!(restored.elapsed_time, 2);
}

#[tokio::test]
async fn corrupt_file_starts_with_no_history() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    std::fs::write(store.path(), "definitely not json").unwrap();
    assert!(store.read().is_err());

    let controller = controller_at(dir.path(), false);
    controller.load().await;

    assert!(controller.is_ready());
    assert!(controller.snapshot().is_empty());
}
