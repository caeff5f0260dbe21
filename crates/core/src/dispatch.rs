//! Routes host events to the engine, the catalog and the refresh loop
//!
//! Events are handled one at a time in arrival order; the connection loop
//! awaits `dispatch` before reading the next message.

use std::sync::Arc;

use toggldeck_domain::HostEvent;
use tracing::{debug, trace};

use crate::catalog::SettingsCatalog;
use crate::engine::ReconciliationEngine;
use crate::refresh::RefreshScheduler;

/// Routes host events to the engine, the catalog and the refresh loop
pub struct EventDispatcher {
    engine: Arc<ReconciliationEngine>,
    catalog: SettingsCatalog,
    scheduler: RefreshScheduler,
}

impl EventDispatcher {
    /// Dispatcher over an engine and the services that share it.
    pub fn new(
        engine: Arc<ReconciliationEngine>,
        catalog: SettingsCatalog,
        scheduler: RefreshScheduler,
    ) -> Self {
        Self { engine, catalog, scheduler }
    }

    /// The engine events are routed to.
    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// The refresh loop started by appearing buttons.
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Handle one host event to completion.
    pub async fn dispatch(&self, event: HostEvent) {
        trace!(event = event.name(), "Dispatching host event");

        match event {
            HostEvent::WillAppear { context, payload } => {
                // Buttons inside a multi-action never show a timer, but a
                // missing token is still flagged.
                if payload.is_in_multi_action {
                    self.engine.check_credential(&context, &payload.settings);
                    return;
                }
                if self.engine.on_button_appear(&context, &payload.settings) {
                    self.scheduler.ensure_running();
                }
            }
            HostEvent::WillDisappear { context, payload } => {
                if !payload.is_in_multi_action {
                    self.engine.on_button_disappear(&context);
                }
            }
            HostEvent::DidReceiveSettings { context, payload } => {
                if payload.is_in_multi_action {
                    return;
                }
                self.engine.on_settings_changed(&context, &payload.settings).await;
                self.scheduler.ensure_running();
            }
            HostEvent::KeyDown { context, payload } => {
                self.engine.on_key_press(&context, &payload.settings).await;
            }
            HostEvent::SendToPlugin { context, payload } => {
                self.catalog.handle(&context, payload).await;
            }
            HostEvent::SystemDidWakeUp => {
                self.engine.resync().await;
                self.scheduler.ensure_running();
            }
            HostEvent::Unsupported => debug!("Ignoring unsupported host event"),
        }
    }

    /// Stop the refresh loop.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}
