// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use lexi_app::{KeyValueStore, Profile, ProfileId, SessionBackend};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn profile(username: &str) -> Profile {
    Profile {
        id: Some(ProfileId::new(format!("user-{username}"))),
        username: Some(username.to_owned()),
    }
}

/// Scripted backend. Clones share call counters so a test can keep a handle
/// after moving the backend into a panel or onto a fetch thread.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    profile: std::result::Result<Profile, String>,
    sign_out_error: Option<String>,
    fetch_calls: Arc<AtomicUsize>,
    sign_out_calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn with_profile(profile: Profile) -> Self {
        Self::new(Ok(profile))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(message.to_owned()))
    }

    fn new(profile: std::result::Result<Profile, String>) -> Self {
        Self {
            profile,
            sign_out_error: None,
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            sign_out_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_sign_out_error(mut self, message: &str) -> Self {
        self.sign_out_error = Some(message.to_owned());
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

impl SessionBackend for FakeBackend {
    fn fetch_current_profile(&self) -> Result<Profile> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone().map_err(|message| anyhow!(message))
    }

    fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sign_out_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory stand-in for browser-style local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = BTreeMap::new();
        items.insert(key.to_owned(), value.to_owned());
        Self { items }
    }

    pub fn item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}
