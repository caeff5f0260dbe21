//! Registry of visible buttons, keyed by host context

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use toggldeck_domain::{ApiToken, Button, ButtonId};

/// Registered buttons keyed by id
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    buttons: HashMap<ButtonId, Button>,
}

impl ButtonRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a button. Returns the replaced button, if any.
    pub fn add(&mut self, button: Button) -> Option<Button> {
        self.buttons.insert(button.id.clone(), button)
    }

    /// Remove `id`, returning the button it held.
    pub fn remove(&mut self, id: &ButtonId) -> Option<Button> {
        self.buttons.remove(id)
    }

    /// Button registered under `id`.
    pub fn get(&self, id: &ButtonId) -> Option<&Button> {
        self.buttons.get(id)
    }

    /// Every registered button, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Button> {
        self.buttons.values()
    }

    /// Ids of every registered button.
    pub fn ids(&self) -> Vec<ButtonId> {
        self.buttons.keys().cloned().collect()
    }

    /// Number of registered buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Whether no button is registered.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Distinct credentials across all buttons, in no particular order.
    pub fn credentials(&self) -> Vec<ApiToken> {
        let mut seen = HashSet::new();
        self.buttons
            .values()
            .filter(|button| seen.insert(&button.credential))
            .map(|button| button.credential.clone())
            .collect()
    }

    /// Whether any button uses `credential`.
    pub fn uses_credential(&self, credential: &ApiToken) -> bool {
        self.buttons.values().any(|button| &button.credential == credential)
    }

    /// Smallest poll frequency requested by any button.
    pub fn min_poll_frequency(&self) -> Option<Duration> {
        self.buttons.values().map(|button| button.poll_frequency).min()
    }
}
