// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Row key of a profile. Text and integer keys both decode; integers keep
/// their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawProfileId", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProfileId {
    Text(String),
    Integer(i64),
}

impl From<RawProfileId> for ProfileId {
    fn from(raw: RawProfileId) -> Self {
        match raw {
            RawProfileId::Text(value) => Self(value),
            RawProfileId::Integer(value) => Self(value.to_string()),
        }
    }
}

/// A row of the backend's `profiles` collection. Only `username` is shown;
/// every other column is optional or ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<ProfileId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelAction {
    Settings,
    Logout,
}

impl PanelAction {
    pub const ALL: [Self; 2] = [Self::Settings, Self::Logout];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Settings => "Settings",
            Self::Logout => "Logout",
        }
    }
}
