//! Background task that advances the world on a fixed interval.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::stats::Stats;
use crate::World;

use super::snapshot::WorldSnapshot;

/// Handle for controlling the simulation task.
///
/// The world sits behind one async mutex; the driver and every reader or
/// writer take that same lock, so a snapshot never observes a half-done tick.
pub struct SimulationHandle {
    world: Arc<Mutex<World>>,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationHandle {
    /// Spawn the driver task. Must be called inside a tokio runtime.
    pub fn spawn(world: World, tick_interval: Duration) -> Self {
        let world = Arc::new(Mutex::new(world));
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(drive(world.clone(), tick_interval, stop_rx));
        log::info!("Simulation driver started, ticking every {:?}", tick_interval);

        Self {
            world,
            stop_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Shared world, for callers that need more than a snapshot
    pub fn world(&self) -> Arc<Mutex<World>> {
        self.world.clone()
    }

    pub async fn snapshot(&self) -> WorldSnapshot {
        self.world.lock().await.get_state()
    }

    /// Reset the world; `false` if it could not be reinitialised
    pub async fn reset(&self) -> bool {
        self.world.lock().await.reset()
    }

    /// Run one tick right away, outside the regular interval
    pub async fn step_once(&self) {
        self.world.lock().await.step();
    }

    pub async fn stats_history(&self) -> Vec<Stats> {
        self.world.lock().await.stats_history.snapshots.iter().cloned().collect()
    }

    /// Check if the driver task is still alive
    pub async fn is_running(&self) -> bool {
        match self.task.lock().await.as_ref() {
            Some(task) => !task.is_finished(),
            None => false,
        }
    }

    /// Signal the driver to stop and wait for it. Returns whether it exited
    /// within `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        // No receiver means the task is already gone
        let _ = self.stop_tx.send(true);

        let Some(task) = self.task.lock().await.take() else {
            return true;
        };

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(())) => {
                log::info!("Simulation driver stopped");
                true
            }
            Ok(Err(e)) => {
                log::error!("Simulation driver ended abnormally: {}", e);
                true
            }
            Err(_) => {
                log::warn!("Simulation driver did not stop within {:?}", timeout);
                false
            }
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Main simulation loop: tick under the lock, release it, then wait for the
/// interval (or a stop signal)
async fn drive(world: Arc<Mutex<World>>, tick_interval: Duration, mut stop_rx: watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow() {
            break;
        }

        {
            let mut guard = world.lock().await;
            let result = panic::catch_unwind(AssertUnwindSafe(|| guard.step()));
            if let Err(payload) = result {
                log::error!("Simulation step {} panicked: {}", guard.time, panic_message(payload.as_ref()));
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(tick_interval) => {}
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    log::debug!("Simulation driver loop exited");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
