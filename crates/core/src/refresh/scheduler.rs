//! Refresh loop lifecycle
//!
//! Runs only while at least one button is registered. Each tick asks the
//! engine to fetch (when due) and repaint; once the registry is empty the
//! loop stops itself and waits for `ensure_running` to start it again.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::ReconciliationEngine;

/// Lifecycle of the refresh loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started
    Idle,
    Running,
    /// Stopped because the registry emptied, or shut down
    Stopped,
}

struct LoopControl {
    state: SchedulerState,
    handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
}

/// Drives the engine's periodic refresh
pub struct RefreshScheduler {
    engine: Arc<ReconciliationEngine>,
    tick: Duration,
    control: Arc<Mutex<LoopControl>>,
}

impl RefreshScheduler {
    /// Idle scheduler ticking every `tick`.
    pub fn new(engine: Arc<ReconciliationEngine>, tick: Duration) -> Self {
        Self {
            engine,
            tick,
            control: Arc::new(Mutex::new(LoopControl {
                state: SchedulerState::Idle,
                handle: None,
                cancel: CancellationToken::new(),
            })),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.control.lock().state
    }

    /// Whether the loop is running.
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Start the loop unless it is already running or there is nothing to
    /// refresh. Returns `true` when a new loop was spawned.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn ensure_running(&self) -> bool {
        let mut control = self.control.lock();
        if control.state == SchedulerState::Running || self.engine.is_empty() {
            return false;
        }

        control.cancel = CancellationToken::new();
        let handle = tokio::spawn(Self::run_loop(
            Arc::clone(&self.engine),
            self.tick,
            Arc::clone(&self.control),
            control.cancel.clone(),
        ));
        control.state = SchedulerState::Running;
        control.handle = Some(handle);

        info!(tick_ms = self.tick.as_millis(), "Refresh loop started");
        true
    }

    /// Cancel the loop and wait briefly for it to finish.
    pub async fn shutdown(&self) {
        let handle = {
            let mut control = self.control.lock();
            control.cancel.cancel();
            control.state = SchedulerState::Stopped;
            control.handle.take()
        };

        if let Some(handle) = handle {
            match tokio::time::timeout(Duration::from_secs(5), handle).await {
                Ok(Ok(())) => debug!("Refresh loop joined"),
                Ok(Err(e)) => warn!(error = %e, "Refresh loop task failed"),
                Err(_) => warn!("Refresh loop did not finish within timeout"),
            }
        }
    }

    async fn run_loop(
        engine: Arc<ReconciliationEngine>,
        tick: Duration,
        control: Arc<Mutex<LoopControl>>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Refresh loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    {
                        // Checked under the control lock so a concurrent
                        // `ensure_running` either sees Running or starts anew.
                        let mut control = control.lock();
                        if engine.is_empty() {
                            control.state = SchedulerState::Stopped;
                            info!("No buttons registered; refresh loop stopped");
                            return;
                        }
                    }
                    engine.tick().await;
                }
            }
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        let control = self.control.lock();
        if !control.cancel.is_cancelled() && control.state == SchedulerState::Running {
            warn!("RefreshScheduler dropped while running; cancelling");
            control.cancel.cancel();
        }
    }
}
