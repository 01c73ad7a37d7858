// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub profile: Option<Profile>,
    pub settings: SettingsVisibility,
    pub api_key: String,
    pub status_line: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            profile: None,
            settings: SettingsVisibility::Hidden,
            api_key: String::new(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    OpenSettings,
    CloseSettings,
    EditApiKey(String),
    ResetApiKey,
    ProfileLoaded(Profile),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    SettingsVisibilityChanged(SettingsVisibility),
    ApiKeyChanged(String),
    ProfileChanged(Option<Profile>),
    StatusUpdated(String),
    StatusCleared,
}

impl PanelState {
    pub fn dispatch(&mut self, command: PanelCommand) -> Vec<PanelEvent> {
        match command {
            PanelCommand::OpenSettings => {
                self.settings = SettingsVisibility::Visible;
                vec![PanelEvent::SettingsVisibilityChanged(self.settings)]
            }
            PanelCommand::CloseSettings => {
                self.settings = SettingsVisibility::Hidden;
                vec![PanelEvent::SettingsVisibilityChanged(self.settings)]
            }
            PanelCommand::EditApiKey(value) => {
                self.api_key = value;
                vec![PanelEvent::ApiKeyChanged(self.api_key.clone())]
            }
            PanelCommand::ResetApiKey => {
                self.api_key.clear();
                vec![
                    PanelEvent::ApiKeyChanged(String::new()),
                    self.set_status("settings reset"),
                ]
            }
            PanelCommand::ProfileLoaded(profile) => {
                self.profile = Some(profile);
                vec![PanelEvent::ProfileChanged(self.profile.clone())]
            }
            PanelCommand::ClearStatus => {
                self.status_line = None;
                vec![PanelEvent::StatusCleared]
            }
        }
    }

    pub fn username(&self) -> &str {
        self.profile
            .as_ref()
            .map(Profile::display_name)
            .unwrap_or("")
    }

    pub fn settings_visible(&self) -> bool {
        self.settings == SettingsVisibility::Visible
    }

    fn set_status(&mut self, message: &str) -> PanelEvent {
        self.status_line = Some(message.to_owned());
        PanelEvent::StatusUpdated(message.to_owned())
    }
}
