//! Clock driver background task

use std::{
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::state::AppState;

/// Fixed tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running tick task.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Abort the task; safe to call repeatedly
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a task that ticks `state` once per period.
///
/// The task only holds a weak reference, so it ends when the controller is
/// dropped, and stops as soon as the controller reports a stale generation.
/// Must be called from within a tokio runtime.
pub fn spawn_clock(state: &Arc<AppState>, generation: u64) -> TickHandle {
    let state = Arc::downgrade(state);
    let task = tokio::spawn(clock_task(state, generation, TICK_PERIOD));
    TickHandle { task }
}

async fn clock_task(state: Weak<AppState>, generation: u64, period: Duration) {
    debug!("Clock task {} started", generation);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first decrement is one period out
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(controller) = state.upgrade() else {
            break;
        };
        if !controller.on_tick(generation) {
            break;
        }
    }

    debug!("Clock task {} stopped", generation);
}
