// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use lexi_app::{API_KEY_STORAGE_KEY, PanelEvent, ProfilePanel, SettingsVisibility};
use lexi_testkit::{FakeBackend, MemoryStorage, profile};

#[test]
fn mount_displays_fetched_username() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::default(),
    );

    panel.mount();
    assert_eq!(panel.state().username(), "alice");
    assert_eq!(panel.backend().fetch_calls(), 1);
}

#[test]
fn mount_with_backend_error_leaves_username_empty() {
    let mut panel = ProfilePanel::new(
        FakeBackend::failing("JSON object requested, multiple (or no) rows returned"),
        MemoryStorage::default(),
    );

    panel.mount();
    assert_eq!(panel.state().profile, None);
    assert_eq!(panel.state().username(), "");
    assert_eq!(panel.state().status_line, None);
    assert_eq!(panel.backend().fetch_calls(), 1);
}

#[test]
fn mount_prefills_stored_api_key() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::with_item(API_KEY_STORAGE_KEY, "sk-test"),
    );

    panel.mount();
    assert_eq!(panel.state().api_key, "sk-test");
}

#[test]
fn every_keystroke_persists_full_value() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::default(),
    );
    panel.mount();
    panel.open_settings();

    let mut typed = String::new();
    for ch in "sk-123".chars() {
        typed.push(ch);
        panel.edit_api_key(typed.clone());
        assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some(typed.as_str()));
    }

    assert_eq!(panel.state().api_key, "sk-123");
    assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some("sk-123"));
}

#[test]
fn clearing_the_field_persists_empty_string() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::with_item(API_KEY_STORAGE_KEY, "s"),
    );
    panel.mount();

    panel.edit_api_key("");
    assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some(""));
}

#[test]
fn reset_clears_field_and_storage() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::with_item(API_KEY_STORAGE_KEY, "sk-test"),
    );
    panel.mount();

    let events = panel.reset_settings();
    assert!(events.contains(&PanelEvent::ApiKeyChanged(String::new())));
    assert_eq!(panel.state().api_key, "");
    assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), None);
    assert!(panel.storage().is_empty());
}

#[test]
fn logout_signs_out_exactly_once() {
    let backend = FakeBackend::with_profile(profile("alice"));
    let mut panel = ProfilePanel::new(backend.clone(), MemoryStorage::default());
    panel.mount();

    assert!(panel.logout());
    assert_eq!(backend.sign_out_calls(), 1);
}

#[test]
fn settings_toggle_does_not_touch_storage() {
    let mut panel = ProfilePanel::new(
        FakeBackend::with_profile(profile("alice")),
        MemoryStorage::with_item(API_KEY_STORAGE_KEY, "sk-test"),
    );
    panel.mount();

    panel.open_settings();
    assert_eq!(panel.state().settings, SettingsVisibility::Visible);
    panel.close_settings();
    assert_eq!(panel.state().settings, SettingsVisibility::Hidden);

    assert_eq!(panel.storage().len(), 1);
    assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some("sk-test"));
}
