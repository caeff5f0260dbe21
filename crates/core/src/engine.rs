//! Reconciliation engine
//!
//! Owns the button registry, the last known running entry per credential
//! and the refresh bookkeeping. Every visual pushed to the host is derived
//! from that cache; remote fetches only update it.
//!
//! State sits behind a single lock that is never held across an `.await`.
//! Network calls run with the lock released and their results are applied
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use toggldeck_domain::constants::{DEFAULT_CREATED_WITH, DEFAULT_POLL_FREQUENCY_SECS};
use toggldeck_domain::{
    ApiToken, Button, ButtonId, ButtonSettings, ButtonVisual, DeckError, MatchResult,
    NewTimeEntry, PluginConfig, RemoteEntry, Result,
};
use tracing::{debug, info, instrument, warn};

use crate::matching;
use crate::ports::{Clock, HostOutlet, TimeTrackingService};
use crate::presentation;
use crate::refresh::RefreshState;
use crate::registry::ButtonRegistry;

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Poll frequency for buttons that do not set one
    pub default_poll: Duration,
    /// `created_with` sent when starting entries
    pub created_with: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_poll: Duration::from_secs(DEFAULT_POLL_FREQUENCY_SECS),
            created_with: DEFAULT_CREATED_WITH.to_string(),
        }
    }
}

impl From<&PluginConfig> for EngineOptions {
    fn from(config: &PluginConfig) -> Self {
        Self {
            default_poll: config.refresh.default_poll(),
            created_with: config.api.created_with.clone(),
        }
    }
}

struct EngineState {
    registry: ButtonRegistry,
    refresh: RefreshState,
    /// Last fetched running entry per credential. A missing key means the
    /// credential was never fetched; `None` means nothing is running.
    entries: HashMap<ApiToken, Option<RemoteEntry>>,
}

impl EngineState {
    /// Drop cached entries whose credential no button uses anymore.
    fn prune_entries(&mut self) {
        let registry = &self.registry;
        self.entries.retain(|credential, _| registry.uses_credential(credential));
    }
}

/// Keeps button visuals in step with the running entry
pub struct ReconciliationEngine {
    service: Arc<dyn TimeTrackingService>,
    host: Arc<dyn HostOutlet>,
    clock: Arc<dyn Clock>,
    options: EngineOptions,
    state: Mutex<EngineState>,
}

impl ReconciliationEngine {
    /// Engine with an empty registry.
    pub fn new(
        service: Arc<dyn TimeTrackingService>,
        host: Arc<dyn HostOutlet>,
        clock: Arc<dyn Clock>,
        options: EngineOptions,
    ) -> Self {
        let state = EngineState {
            registry: ButtonRegistry::new(),
            refresh: RefreshState::new(options.default_poll),
            entries: HashMap::new(),
        };
        Self { service, host, clock, options, state: Mutex::new(state) }
    }

    /// Whether no button is registered.
    pub fn is_empty(&self) -> bool {
        self.state.lock().registry.is_empty()
    }

    /// Whether `id` is registered.
    pub fn is_registered(&self, id: &ButtonId) -> bool {
        self.state.lock().registry.get(id).is_some()
    }

    /// Current fetch interval (smallest poll frequency of any button).
    pub fn current_interval(&self) -> Duration {
        self.state.lock().refresh.current_interval()
    }

    /// Last fetched running entry for `credential`.
    pub fn cached_entry(&self, credential: &ApiToken) -> Option<RemoteEntry> {
        self.state.lock().entries.get(credential).cloned().flatten()
    }

    /// Register a button that became visible.
    ///
    /// Without a credential the button is not registered and the host shows
    /// an alert. Settings still using the legacy fallback flag are written
    /// back in the current layout. Returns whether the button was
    /// registered.
    pub fn on_button_appear(&self, id: &ButtonId, settings: &ButtonSettings) -> bool {
        if !self.check_credential(id, settings) || !self.register(id, settings) {
            return false;
        }

        if let Some(visual) = self.visual_for(id) {
            self.push_visual(id, &visual);
        }
        true
    }

    /// Show an alert on `id` when its settings carry no API token.
    /// Returns whether a token is present.
    pub fn check_credential(&self, id: &ButtonId, settings: &ButtonSettings) -> bool {
        if settings.credential().is_some() {
            return true;
        }
        warn!(button = %id, "Button has no API token; not tracking it");
        self.host.show_alert(id);
        false
    }

    /// Forget a button. Returns whether it was registered.
    pub fn on_button_disappear(&self, id: &ButtonId) -> bool {
        let mut state = self.state.lock();
        let removed = state.registry.remove(id).is_some();
        if removed {
            let EngineState { registry, refresh, .. } = &mut *state;
            refresh.recompute(registry);
            state.prune_entries();
            debug!(button = %id, remaining = state.registry.len(), "Button unregistered");
        }
        removed
    }

    /// Re-register a button with new settings and refresh right away.
    pub async fn on_settings_changed(&self, id: &ButtonId, settings: &ButtonSettings) {
        {
            let mut state = self.state.lock();
            state.registry.remove(id);
            let EngineState { registry, refresh, .. } = &mut *state;
            refresh.recompute(registry);
            state.prune_entries();
        }

        if !self.register(id, settings) {
            debug!(button = %id, "Settings carry no API token; button left unregistered");
        }
        self.refresh_now().await;
    }

    /// Toggle tracking for a pressed button.
    ///
    /// Stops the running entry when the button claims it and starts the
    /// button's own entry otherwise. Failures are logged and surface as a
    /// host alert.
    #[instrument(skip_all, fields(button = %id))]
    pub async fn on_key_press(&self, id: &ButtonId, settings: &ButtonSettings) {
        let Some(button) = Button::from_settings(id.clone(), settings, self.options.default_poll)
        else {
            warn!("Key press without API token");
            self.host.show_alert(id);
            return;
        };

        if let Err(err) = self.toggle(&button).await {
            warn!(error = %err, kind = err.label(), "Failed to toggle time entry");
            self.host.show_alert(id);
        }
        self.push_visuals();
    }

    async fn toggle(&self, button: &Button) -> Result<()> {
        let workspace_id = button
            .workspace_id
            .ok_or_else(|| DeckError::InvalidInput("button has no workspace".into()))?;

        let current = match self.service.current_entry(&button.credential).await {
            Ok(entry) => {
                self.apply_entry(&button.credential, entry.clone());
                entry
            }
            Err(err) => {
                warn!(error = %err, "Could not fetch running entry; using cached one");
                self.cached_entry(&button.credential)
            }
        };

        let result = {
            let state = self.state.lock();
            matching::classify(current.as_ref(), button, state.registry.iter())
        };

        match current {
            Some(entry) if result.is_match() => {
                let stopped = self
                    .service
                    .stop_entry(&button.credential, entry.workspace_id, entry.id)
                    .await?;
                info!(entry_id = stopped.id, "Stopped time entry");
                self.apply_entry(&button.credential, None);
            }
            _ => {
                let body = NewTimeEntry::for_button(
                    button,
                    workspace_id,
                    self.clock.now(),
                    &self.options.created_with,
                );
                let started = self.service.start_entry(&button.credential, &body).await?;
                info!(entry_id = started.id, "Started time entry");
                self.apply_entry(&button.credential, Some(started));
            }
        }
        Ok(())
    }

    /// One refresh loop tick: fetch when due, then repaint every button.
    pub async fn tick(&self) {
        let due = {
            let mut state = self.state.lock();
            if state.registry.is_empty() {
                return;
            }
            let now = self.clock.now();
            if state.refresh.is_due(now) {
                state.refresh.mark_refreshed(now);
                Some(state.registry.credentials())
            } else {
                None
            }
        };

        if let Some(credentials) = due {
            self.fetch_entries(&credentials).await;
        }
        self.push_visuals();
    }

    /// Fetch every credential now, then repaint.
    pub async fn refresh_now(&self) {
        let credentials = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            state.refresh.mark_refreshed(now);
            state.registry.credentials()
        };

        self.fetch_entries(&credentials).await;
        self.push_visuals();
    }

    /// After the machine wakes: ask the host to resend every button's
    /// settings and refresh.
    pub async fn resync(&self) {
        let ids = self.state.lock().registry.ids();
        info!(buttons = ids.len(), "Resynchronising after wake");
        for id in &ids {
            self.host.get_settings(id);
        }
        self.refresh_now().await;
    }

    /// Visual for one registered button from the cached entry.
    pub fn visual_for(&self, id: &ButtonId) -> Option<ButtonVisual> {
        let state = self.state.lock();
        let button = state.registry.get(id)?;
        let now = self.clock.now();
        Some(Self::render(&state, button, now))
    }

    /// How a registered button currently relates to the cached entry.
    pub fn match_for(&self, id: &ButtonId) -> Option<MatchResult> {
        let state = self.state.lock();
        let button = state.registry.get(id)?;
        let entry = state.entries.get(&button.credential).and_then(Option::as_ref);
        Some(matching::classify(entry, button, state.registry.iter()))
    }

    /// Push state and title to every registered button.
    pub fn push_visuals(&self) {
        let visuals = {
            let state = self.state.lock();
            let now = self.clock.now();
            let mut visuals: Vec<_> = state
                .registry
                .iter()
                .map(|button| (button.id.clone(), Self::render(&state, button, now)))
                .collect();
            visuals.sort_by(|a, b| a.0.cmp(&b.0));
            visuals
        };

        for (id, visual) in &visuals {
            self.push_visual(id, visual);
        }
    }

    fn push_visual(&self, id: &ButtonId, visual: &ButtonVisual) {
        self.host.set_state(id, visual.state);
        self.host.set_title(id, &visual.title);
    }

    fn render(
        state: &EngineState,
        button: &Button,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ButtonVisual {
        let entry = state.entries.get(&button.credential).and_then(Option::as_ref);
        let result = matching::classify(entry, button, state.registry.iter());
        presentation::render(result, entry, button, now)
    }

    /// Add or replace a button. Returns `false` when the settings carry no
    /// credential.
    fn register(&self, id: &ButtonId, settings: &ButtonSettings) -> bool {
        let Some(button) = Button::from_settings(id.clone(), settings, self.options.default_poll)
        else {
            return false;
        };

        if settings.needs_migration() {
            debug!(button = %id, "Rewriting legacy fallback setting");
            self.host.set_settings(id, &settings.migrated());
        }

        let mut state = self.state.lock();
        let fresh_credential = !state.entries.contains_key(&button.credential);
        state.registry.add(button);
        let EngineState { registry, refresh, .. } = &mut *state;
        refresh.recompute(registry);
        if fresh_credential {
            refresh.invalidate();
        }
        state.prune_entries();
        debug!(
            button = %id,
            buttons = state.registry.len(),
            interval_ms = state.refresh.current_interval().as_millis(),
            "Button registered"
        );
        true
    }

    async fn fetch_entries(&self, credentials: &[ApiToken]) {
        for credential in credentials {
            match self.service.current_entry(credential).await {
                Ok(entry) => self.apply_entry(credential, entry),
                Err(err) => {
                    // Keep the stale entry; the next due tick retries.
                    warn!(error = %err, kind = err.label(), "Failed to fetch running entry");
                }
            }
        }
    }

    fn apply_entry(&self, credential: &ApiToken, entry: Option<RemoteEntry>) {
        let mut state = self.state.lock();
        if !state.registry.uses_credential(credential) {
            return;
        }
        state.entries.insert(credential.clone(), entry.filter(RemoteEntry::is_running));
    }
}
