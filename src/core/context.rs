//! Shared pipeline context: pause/step state and process shutdown.
//!
//! The context replaces process-global mutable state with an explicit
//! object handed to every endpoint at construction and to the dashboard.
//! It is created once per process and shared by `Arc`.

use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
struct PauseFlags {
    paused: bool,
    step_requested: bool,
}

/// Cooperative pause/step state consulted by every active producer.
///
/// Suspension always parks on a [`Notify`] and yields to the scheduler;
/// there is no polling loop against the flags.
#[derive(Debug, Default)]
pub struct PauseState {
    flags: Mutex<PauseFlags>,
    notify: Notify,
}

impl PauseState {
    /// Whether producers are currently suspended.
    pub fn is_paused(&self) -> bool {
        self.flags.lock().unwrap().paused
    }

    /// Suspend emission of further elements.
    pub fn pause(&self) {
        self.set_paused(true);
    }

    /// Resume emission.
    pub fn resume(&self) {
        self.set_paused(false);
    }

    /// Flip between paused and running.
    pub fn toggle(&self) {
        let mut flags = self.flags.lock().unwrap();
        flags.paused = !flags.paused;
        debug!(paused = flags.paused, "pause toggled");
        drop(flags);
        self.notify.notify_waiters();
    }

    /// Request that one suspended producer release a single element.
    ///
    /// Meaningful only while paused; otherwise a no-op.
    pub fn request_step(&self) {
        let mut flags = self.flags.lock().unwrap();
        flags.step_requested = flags.paused;
        drop(flags);
        self.notify.notify_waiters();
    }

    /// Suspend until `!paused || step_requested`.
    ///
    /// Consumes at most one pending step request per call, so a single
    /// step releases exactly one further element before re-pausing.
    pub async fn wait_while_paused(&self) {
        loop {
            let notified = self.notify.notified();
            {
                let mut flags = self.flags.lock().unwrap();
                if !flags.paused {
                    return;
                }
                if flags.step_requested {
                    flags.step_requested = false;
                    return;
                }
            }
            notified.await;
        }
    }

    fn set_paused(&self, paused: bool) {
        let mut flags = self.flags.lock().unwrap();
        flags.paused = paused;
        if !paused {
            flags.step_requested = false;
        }
        debug!(paused, "pause state changed");
        drop(flags);
        self.notify.notify_waiters();
    }
}

/// Shared state injected into every endpoint and the dashboard.
#[derive(Debug, Default)]
pub struct Context {
    pause: PauseState,
    shutdown: CancellationToken,
}

impl Context {
    /// Create a fresh context, running and not shut down.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The pause/step state shared with every producer.
    pub fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    /// Whether producers are currently suspended.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Suspend the calling producer while the pipeline is paused.
    pub async fn wait_while_paused(&self) {
        self.pause.wait_while_paused().await;
    }

    /// Token cancelled when process termination is requested.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Request confirmed termination; long-running producers complete
    /// their sequences without aborting in-flight operations.
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_immediately_when_running() {
        let state = PauseState::default();
        tokio::time::timeout(Duration::from_millis(50), state.wait_while_paused())
            .await
            .expect("must not suspend while running");
    }

    #[tokio::test]
    async fn step_releases_exactly_one_wait() {
        let state = Arc::new(PauseState::default());
        state.pause();

        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                state.wait_while_paused().await;
                state.wait_while_paused().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        state.request_step();
        tokio::time::sleep(Duration::from_millis(20)).await;
        // Second wait is still suspended: the step was consumed.
        assert!(!waiter.is_finished());

        state.resume();
        tokio::time::timeout(Duration::from_millis(100), waiter)
            .await
            .expect("resume releases the waiter")
            .unwrap();
    }

    #[tokio::test]
    async fn step_while_running_is_a_no_op() {
        let state = PauseState::default();
        state.request_step();
        state.pause();
        // The earlier step request must not leak into the paused phase.
        let wait = state.wait_while_paused();
        assert!(
            tokio::time::timeout(Duration::from_millis(30), wait)
                .await
                .is_err()
        );
    }
}
