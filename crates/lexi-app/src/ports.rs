// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::Profile;

/// Storage key holding the user's OpenAI API key.
pub const API_KEY_STORAGE_KEY: &str = "openai-api-key";

/// Data access for the signed-in session.
pub trait SessionBackend {
    /// Reads the single profile row belonging to the current session.
    fn fetch_current_profile(&self) -> Result<Profile>;

    /// Ends the current session.
    fn sign_out(&self) -> Result<()>;
}

/// Client-local persistent key-value storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}
