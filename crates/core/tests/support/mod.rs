//! Shared test helpers for `toggldeck-core` integration tests.
//!
//! In-memory stand-ins for the remote service, the host and the clock so
//! tests can drive the engine deterministically.

#![allow(dead_code)]

pub mod clock;
pub mod host;
pub mod service;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use toggldeck_core::{EngineOptions, ReconciliationEngine};
use toggldeck_domain::{ButtonSettings, RemoteEntry};

pub use clock::ManualClock;
pub use host::RecordingHost;
pub use service::ScriptedService;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn settings(json: serde_json::Value) -> ButtonSettings {
    serde_json::from_value(json).expect("settings should deserialize")
}

pub fn running_entry(
    id: u64,
    workspace_id: u64,
    project_id: Option<u64>,
    description: &str,
    start: DateTime<Utc>,
) -> RemoteEntry {
    RemoteEntry {
        id,
        workspace_id,
        project_id,
        task_id: None,
        description: description.to_string(),
        start,
        stop: None,
        billable: false,
    }
}

/// Engine wired to fresh fakes.
pub struct Harness {
    pub service: Arc<ScriptedService>,
    pub host: Arc<RecordingHost>,
    pub clock: Arc<ManualClock>,
    pub engine: Arc<ReconciliationEngine>,
}

impl Harness {
    pub fn new() -> Self {
        let service = Arc::new(ScriptedService::default());
        let host = Arc::new(RecordingHost::default());
        let clock = Arc::new(ManualClock::new(t0()));
        let engine = Arc::new(ReconciliationEngine::new(
            service.clone(),
            host.clone(),
            clock.clone(),
            EngineOptions::default(),
        ));
        Self { service, host, clock, engine }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
