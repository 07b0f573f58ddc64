mod common;

use std::time::Duration;

use common::{engine_with, handle, Recorder, ScriptedLocator};
use process_monitor::state::{lock_state, new_state, AppState};
use process_monitor::{EngineConfig, MonitorState, SampleError};

fn sync(state: &AppState) {
    let mut guard = lock_state(state);
    let inner = &mut *guard;
    inner.scheduler.sync(&inner.engine, state);
}

fn samples(state: &AppState) -> usize {
    lock_state(state).engine.history().len()
}

#[tokio::test]
async fn test_ticks_while_running_and_stops_on_pause() {
    let recorder = Recorder::default();
    let locator = ScriptedLocator::new(&recorder).always_finds(handle(42, "alpha"));
    let state = new_state(engine_with(locator, &recorder));

    lock_state(&state)
        .engine
        .start(EngineConfig::new("alpha", 10))
        .unwrap();
    sync(&state);
    assert!(lock_state(&state).scheduler.is_scheduled());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(samples(&state) > 0);

    lock_state(&state).engine.pause().unwrap();
    sync(&state);
    assert!(!lock_state(&state).scheduler.is_scheduled());

    let paused_at = samples(&state);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(samples(&state), paused_at);

    lock_state(&state).engine.resume().unwrap();
    sync(&state);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(samples(&state) > paused_at);
}

#[tokio::test]
async fn test_task_ends_when_process_is_lost() {
    let recorder = Recorder::default();
    let locator = ScriptedLocator::new(&recorder)
        .always_finds(handle(42, "alpha"))
        .then_sample(Ok(common::metrics(5.0, 5.0)))
        .then_sample(Ok(common::metrics(6.0, 6.0)))
        .default_sample(Err(SampleError::Gone));
    let state = new_state(engine_with(locator, &recorder));

    lock_state(&state)
        .engine
        .start(EngineConfig::new("alpha", 10))
        .unwrap();
    sync(&state);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let inner = lock_state(&state);
    assert_eq!(inner.engine.state(), MonitorState::Stopped);
    assert!(!inner.scheduler.is_scheduled());
    assert_eq!(recorder.exports().len(), 1);
    assert_eq!(recorder.exports()[0].len(), 2);
}

#[tokio::test]
async fn test_reset_cancels_ticks() {
    let recorder = Recorder::default();
    let locator = ScriptedLocator::new(&recorder).always_finds(handle(42, "alpha"));
    let state = new_state(engine_with(locator, &recorder));

    lock_state(&state)
        .engine
        .start(EngineConfig::new("alpha", 10))
        .unwrap();
    sync(&state);
    tokio::time::sleep(Duration::from_millis(100)).await;

    lock_state(&state).engine.reset();
    sync(&state);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let inner = lock_state(&state);
    assert_eq!(inner.engine.state(), MonitorState::Idle);
    assert!(inner.engine.history().is_empty());
    assert!(!inner.scheduler.is_scheduled());
}
