//! Pause controller and endpoint status board.
//!
//! The dashboard is the event sink behind a terminal UI: it subscribes
//! to each registered endpoint's lifecycle events and keeps one status
//! row per endpoint, queryable at any time. Rendering is not part of
//! this crate; neither is the keyboard loop. The input bindings
//! (pause/step/quit keys) surface here as methods.

use crate::core::context::Context;
use crate::core::endpoint::Endpoint;
use crate::core::error::{Error, Result};
use crate::core::events::EndpointEvent;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

static DASHBOARD_LIVE: AtomicBool = AtomicBool::new(false);

/// Where an endpoint currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
    Waiting,
    Running,
    Finished,
    Error,
    Pushed,
    Cleared,
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EndpointStatus::Waiting => "waiting",
            EndpointStatus::Running => "running",
            EndpointStatus::Finished => "finished",
            EndpointStatus::Error => "error",
            EndpointStatus::Pushed => "pushed",
            EndpointStatus::Cleared => "cleared",
        };
        write!(f, "{}", label)
    }
}

/// One endpoint's line on the board.
#[derive(Debug, Clone)]
pub struct StatusRow {
    pub name: String,
    pub status: EndpointStatus,
    pub last_value: Option<String>,
}

/// Process-wide pause controller and endpoint status sink.
///
/// At most one dashboard may be live per process; constructing a second
/// while the first exists is a configuration error. The guard is
/// released when the dashboard is dropped.
#[derive(Debug)]
pub struct Dashboard {
    ctx: Arc<Context>,
    rows: Arc<Mutex<IndexMap<String, StatusRow>>>,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Dashboard {
    pub fn new(ctx: Arc<Context>) -> Result<Self> {
        if DASHBOARD_LIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::configuration(
                "a dashboard already exists; only one may be live per process",
            ));
        }
        Ok(Self {
            ctx,
            rows: Arc::new(Mutex::new(IndexMap::new())),
            tasks: Mutex::new(HashMap::new()),
        })
    }

    /// Add a status row for `endpoint` and start mirroring its events.
    ///
    /// Re-registering a name replaces the previous subscription.
    pub fn register(&self, endpoint: &dyn Endpoint) {
        let name = endpoint.name().to_string();
        info!(endpoint = %name, "dashboard: endpoint registered");
        self.rows.lock().unwrap().insert(
            name.clone(),
            StatusRow {
                name: name.clone(),
                status: EndpointStatus::Waiting,
                last_value: None,
            },
        );

        let mut events = endpoint.subscribe_events();
        let rows = Arc::clone(&self.rows);
        let row_name = name.clone();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => apply_event(&rows, &row_name, event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(endpoint = %row_name, skipped, "dashboard: event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        if let Some(previous) = self.tasks.lock().unwrap().insert(name, handle) {
            previous.abort();
        }
    }

    /// Drop an endpoint's row and stop mirroring its events.
    pub fn unregister(&self, name: &str) {
        if let Some(handle) = self.tasks.lock().unwrap().remove(name) {
            handle.abort();
        }
        self.rows.lock().unwrap().shift_remove(name);
    }

    /// All status rows, in registration order.
    pub fn rows(&self) -> Vec<StatusRow> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    /// The current status of one endpoint, if registered.
    pub fn status(&self, name: &str) -> Option<EndpointStatus> {
        self.rows.lock().unwrap().get(name).map(|row| row.status)
    }

    /// Pause/resume binding.
    pub fn toggle_pause(&self) {
        self.ctx.pause_state().toggle();
    }

    /// Single-step binding; meaningful only while paused.
    pub fn step(&self) {
        self.ctx.pause_state().request_step();
    }

    /// Confirmed-termination binding: cancels the context shutdown
    /// token so long-running producers complete their sequences.
    pub fn request_quit(&self) {
        info!("dashboard: quit requested");
        self.ctx.request_shutdown();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.lock().unwrap().drain() {
            handle.abort();
        }
        DASHBOARD_LIVE.store(false, Ordering::SeqCst);
    }
}

fn apply_event(rows: &Mutex<IndexMap<String, StatusRow>>, name: &str, event: EndpointEvent) {
    let mut rows = rows.lock().unwrap();
    let row = match rows.get_mut(name) {
        Some(row) => row,
        None => return,
    };
    match event {
        EndpointEvent::ReadStart => row.status = EndpointStatus::Running,
        EndpointEvent::ReadData(record) => {
            row.status = EndpointStatus::Running;
            row.last_value = Some(record.to_string());
        }
        EndpointEvent::ReadEnd => row.status = EndpointStatus::Finished,
        EndpointEvent::ReadError(error) => {
            row.status = EndpointStatus::Error;
            row.last_value = Some(error.to_string());
        }
        EndpointEvent::Push(record) => {
            row.status = EndpointStatus::Pushed;
            row.last_value = Some(record.to_string());
        }
        EndpointEvent::Clear(selector) => {
            row.status = EndpointStatus::Cleared;
            row.last_value = Some(selector.to_string());
        }
    }
}
