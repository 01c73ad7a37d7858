// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    API_KEY_STORAGE_KEY, KeyValueStore, PanelCommand, PanelEvent, PanelState, Profile,
    ProfileId, SessionBackend,
};

/// The profile panel: UI state plus the backend and local storage it talks to.
///
/// Only the profile fetch has an error path of its own, and it ends in a log
/// line. Storage and sign-out failures are logged too, never shown or
/// returned.
pub struct ProfilePanel<B, S> {
    state: PanelState,
    backend: B,
    storage: S,
}

impl<B, S> ProfilePanel<B, S>
where
    B: SessionBackend,
    S: KeyValueStore,
{
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            state: PanelState::default(),
            backend,
            storage,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn dispatch(&mut self, command: PanelCommand) -> Vec<PanelEvent> {
        self.state.dispatch(command)
    }

    /// Loads the stored API key and the session's profile. Neither step
    /// depends on the other.
    pub fn mount(&mut self) -> Vec<PanelEvent> {
        let mut events = self.load_api_key();
        events.extend(self.load_profile());
        events
    }

    pub fn load_profile(&mut self) -> Vec<PanelEvent> {
        let result = self.backend.fetch_current_profile();
        self.apply_profile_result(result)
    }

    pub fn apply_profile_result(&mut self, result: Result<Profile>) -> Vec<PanelEvent> {
        match result {
            Ok(profile) => {
                tracing::debug!(
                    profile_id = profile.id.as_ref().map_or("", ProfileId::as_str),
                    "profile loaded"
                );
                self.state.dispatch(PanelCommand::ProfileLoaded(profile))
            }
            // The profile stays unset, so the username renders empty.
            Err(error) => {
                tracing::error!("fetch profile: {error:#}");
                Vec::new()
            }
        }
    }

    pub fn load_api_key(&mut self) -> Vec<PanelEvent> {
        match self.storage.get_item(API_KEY_STORAGE_KEY) {
            Ok(Some(value)) if !value.is_empty() => {
                self.state.dispatch(PanelCommand::EditApiKey(value))
            }
            Ok(_) => Vec::new(),
            Err(error) => {
                log_storage_failure("read api key", &error);
                Vec::new()
            }
        }
    }

    pub fn open_settings(&mut self) -> Vec<PanelEvent> {
        self.state.dispatch(PanelCommand::OpenSettings)
    }

    pub fn close_settings(&mut self) -> Vec<PanelEvent> {
        self.state.dispatch(PanelCommand::CloseSettings)
    }

    /// Replaces the field and persists the full value right away.
    pub fn edit_api_key(&mut self, value: impl Into<String>) -> Vec<PanelEvent> {
        let value = value.into();
        let persisted = self.storage.set_item(API_KEY_STORAGE_KEY, &value);
        if let Err(error) = persisted {
            log_storage_failure("save api key", &error);
        }
        self.state.dispatch(PanelCommand::EditApiKey(value))
    }

    pub fn reset_settings(&mut self) -> Vec<PanelEvent> {
        let removed = self.storage.remove_item(API_KEY_STORAGE_KEY);
        if let Err(error) = removed {
            log_storage_failure("remove api key", &error);
        }
        self.state.dispatch(PanelCommand::ResetApiKey)
    }

    /// Ends the session and waits for the backend to confirm. Returns whether
    /// the sign-out went through.
    #[must_use]
    pub fn logout(&self) -> bool {
        match self.backend.sign_out() {
            Ok(()) => {
                tracing::info!("signed out");
                true
            }
            Err(error) => {
                tracing::warn!("sign out: {error:#}");
                false
            }
        }
    }
}

fn log_storage_failure(action: &str, error: &anyhow::Error) {
    tracing::warn!("{action} failed: {error:#}");
}
