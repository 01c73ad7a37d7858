// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use lexi_app::{
    KeyValueStore, PanelAction, PanelCommand, PanelEvent, PanelState, Profile, ProfilePanel,
    SessionBackend,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

const API_KEY_PLACEHOLDER: &str = "sk-xxxxxxxxx";
const API_KEY_HELP: &str = "Set your OpenAI API key to enable the AI to generate description for new words that you add to your collections.";
const CURSOR_MARK: &str = "›";
const OVERLAY_WIDTH_PERCENT: u16 = 60;
const OVERLAY_HEIGHT_PERCENT: u16 = 50;
const TRANSITION: Duration = Duration::from_millis(200);
const IDLE_POLL: Duration = Duration::from_millis(120);
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    SignedOut,
}

#[derive(Debug)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    ProfileFetched(Result<Profile>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SettingsFocus {
    #[default]
    ApiKey,
    Reset,
}

impl SettingsFocus {
    const fn toggled(self) -> Self {
        match self {
            Self::ApiKey => Self::Reset,
            Self::Reset => Self::ApiKey,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionDirection {
    Enter,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OverlayTransition {
    started: Instant,
    direction: TransitionDirection,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayFrame {
    scale: f64,
    faded: bool,
}

#[derive(Debug, Default)]
struct ViewData {
    cursor: usize,
    focus: SettingsFocus,
    transition: Option<OverlayTransition>,
    status_token: u64,
}

pub fn run_app<B, S>(panel: &mut ProfilePanel<B, S>) -> Result<ExitReason>
where
    B: SessionBackend + Clone + Send + 'static,
    S: KeyValueStore,
{
    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let events = panel.load_api_key();
    track_status(&mut view_data, &internal_tx, &events);
    spawn_profile_fetch(panel.backend().clone(), internal_tx.clone());

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(ExitReason::Quit);
    loop {
        process_internal_events(panel, &mut view_data, &internal_tx, &internal_rx);

        let now = Instant::now();
        if let Err(error) = terminal.draw(|frame| render(frame, panel.state(), &view_data, now)) {
            result = Err(error).context("draw frame");
            break;
        }

        let poll = if animating(&view_data, now) {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        let has_event = match event::poll(poll).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if let Some(reason) = handle_key_event(panel, &mut view_data, &internal_tx, key) {
                    result = Ok(reason);
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Runs the profile read off the UI thread. The result comes back as an
/// `InternalEvent`; nothing waits for it and nothing cancels it.
pub fn spawn_profile_fetch<B>(backend: B, tx: Sender<InternalEvent>)
where
    B: SessionBackend + Send + 'static,
{
    thread::spawn(move || {
        let result = backend.fetch_current_profile();
        if tx.send(InternalEvent::ProfileFetched(result)).is_err() {
            tracing::debug!("profile fetch finished after the panel closed");
        }
    });
}

fn process_internal_events<B, S>(
    panel: &mut ProfilePanel<B, S>,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) where
    B: SessionBackend,
    S: KeyValueStore,
{
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                panel.dispatch(PanelCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::ProfileFetched(result) => {
                let events = panel.apply_profile_result(result);
                track_status(view_data, tx, &events);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn track_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, events: &[PanelEvent]) {
    if events
        .iter()
        .any(|event| matches!(event, PanelEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn handle_key_event<B, S>(
    panel: &mut ProfilePanel<B, S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Option<ExitReason>
where
    B: SessionBackend,
    S: KeyValueStore,
{
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(ExitReason::Quit);
    }

    if panel.state().settings_visible() {
        let events = handle_settings_key(panel, view_data, key);
        track_status(view_data, internal_tx, &events);
        return None;
    }

    match key.code {
        KeyCode::Char('q') => return Some(ExitReason::Quit),
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.cursor = (view_data.cursor + 1).min(PanelAction::ALL.len() - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.cursor = view_data.cursor.saturating_sub(1);
        }
        KeyCode::Char('s') => open_settings(panel, view_data),
        KeyCode::Enter => match selected_action(view_data) {
            PanelAction::Settings => open_settings(panel, view_data),
            PanelAction::Logout => {
                if panel.logout() {
                    return Some(ExitReason::SignedOut);
                }
            }
        },
        _ => {}
    }
    None
}

fn handle_settings_key<B, S>(
    panel: &mut ProfilePanel<B, S>,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> Vec<PanelEvent>
where
    B: SessionBackend,
    S: KeyValueStore,
{
    match key.code {
        KeyCode::Esc => {
            view_data.focus = SettingsFocus::ApiKey;
            view_data.transition = Some(OverlayTransition {
                started: Instant::now(),
                direction: TransitionDirection::Exit,
            });
            panel.close_settings()
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            view_data.focus = view_data.focus.toggled();
            Vec::new()
        }
        KeyCode::Enter if view_data.focus == SettingsFocus::Reset => panel.reset_settings(),
        KeyCode::Backspace if view_data.focus == SettingsFocus::ApiKey => {
            let mut value = panel.state().api_key.clone();
            if value.pop().is_none() {
                return Vec::new();
            }
            panel.edit_api_key(value)
        }
        KeyCode::Char(ch)
            if view_data.focus == SettingsFocus::ApiKey
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut value = panel.state().api_key.clone();
            value.push(ch);
            panel.edit_api_key(value)
        }
        _ => Vec::new(),
    }
}

fn open_settings<B, S>(panel: &mut ProfilePanel<B, S>, view_data: &mut ViewData)
where
    B: SessionBackend,
    S: KeyValueStore,
{
    view_data.focus = SettingsFocus::ApiKey;
    view_data.transition = Some(OverlayTransition {
        started: Instant::now(),
        direction: TransitionDirection::Enter,
    });
    panel.open_settings();
}

fn selected_action(view_data: &ViewData) -> PanelAction {
    PanelAction::ALL
        .get(view_data.cursor)
        .copied()
        .unwrap_or(PanelAction::Settings)
}

fn animating(view_data: &ViewData, now: Instant) -> bool {
    view_data
        .transition
        .is_some_and(|transition| now.saturating_duration_since(transition.started) < TRANSITION)
}

fn transition_progress(transition: OverlayTransition, now: Instant) -> f64 {
    let elapsed = now.saturating_duration_since(transition.started);
    (elapsed.as_secs_f64() / TRANSITION.as_secs_f64()).clamp(0.0, 1.0)
}

/// Overlay geometry for this frame: scales 90% -> 100% on the way in and back
/// on the way out, dimmed for the faint half of the fade.
fn overlay_frame(visible: bool, view_data: &ViewData, now: Instant) -> Option<OverlayFrame> {
    let settled = visible.then_some(OverlayFrame {
        scale: 1.0,
        faded: false,
    });
    let Some(transition) = view_data.transition else {
        return settled;
    };
    let progress = transition_progress(transition, now);
    if progress >= 1.0 {
        return settled;
    }

    match transition.direction {
        TransitionDirection::Enter if visible => Some(OverlayFrame {
            scale: 0.9 + 0.1 * progress,
            faded: progress < 0.5,
        }),
        TransitionDirection::Exit if !visible => Some(OverlayFrame {
            scale: 1.0 - 0.1 * progress,
            faded: progress >= 0.5,
        }),
        _ => settled,
    }
}

fn scaled_percent(base: u16, scale: f64) -> u16 {
    let scaled = (f64::from(base) * scale).round();
    (scaled as u16).clamp(1, 100)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &PanelState, view_data: &ViewData, now: Instant) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let overlay = overlay_frame(state.settings_visible(), view_data, now);
    let panel_style = if overlay.is_some() {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let body = Paragraph::new(render_panel_text(state, view_data))
        .style(panel_style)
        .block(Block::default().title("lexi").borders(Borders::ALL));
    frame.render_widget(body, layout[0]);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[1]);

    if let Some(overlay) = overlay {
        let area = centered_rect(
            scaled_percent(OVERLAY_WIDTH_PERCENT, overlay.scale),
            scaled_percent(OVERLAY_HEIGHT_PERCENT, overlay.scale),
            frame.area(),
        );
        let style = if overlay.faded {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Clear, area);
        let settings = Paragraph::new(render_settings_overlay_text(state, view_data))
            .style(style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Settings")
                    .title_bottom("esc ✕")
                    .borders(Borders::ALL),
            );
        frame.render_widget(settings, area);
    }
}

fn render_panel_text(state: &PanelState, view_data: &ViewData) -> String {
    let mut lines = vec![state.username().to_owned(), String::new()];
    for (index, action) in PanelAction::ALL.iter().enumerate() {
        let mark = if index == view_data.cursor {
            CURSOR_MARK
        } else {
            " "
        };
        lines.push(format!("{mark} {}", action.label()));
    }
    lines.join("\n")
}

fn render_settings_overlay_text(state: &PanelState, view_data: &ViewData) -> String {
    let field = if state.api_key.is_empty() {
        API_KEY_PLACEHOLDER
    } else {
        state.api_key.as_str()
    };
    let (key_mark, reset_mark) = match view_data.focus {
        SettingsFocus::ApiKey => (CURSOR_MARK, " "),
        SettingsFocus::Reset => (" ", CURSOR_MARK),
    };

    [
        "OpenAI API Key".to_owned(),
        format!("{key_mark} [{field}]"),
        API_KEY_HELP.to_owned(),
        String::new(),
        "System".to_owned(),
        format!("{reset_mark} Reset settings"),
    ]
    .join("\n")
}

fn status_text(state: &PanelState) -> String {
    let hints = if state.settings_visible() {
        "type to edit key | tab focus | enter reset | esc close | ctrl+q"
    } else {
        "j/k move | enter select | s settings | q quit"
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        ExitReason, InternalEvent, OverlayTransition, SettingsFocus, TRANSITION,
        TransitionDirection, ViewData, handle_key_event, overlay_frame, process_internal_events,
        render, render_panel_text, render_settings_overlay_text, scaled_percent,
        spawn_profile_fetch, status_text,
    };
    use anyhow::anyhow;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lexi_app::{API_KEY_STORAGE_KEY, PanelState, ProfilePanel, SettingsVisibility};
    use lexi_testkit::{FakeBackend, MemoryStorage, profile};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    type TestPanel = ProfilePanel<FakeBackend, MemoryStorage>;

    fn panel_with(storage: MemoryStorage) -> TestPanel {
        ProfilePanel::new(FakeBackend::with_profile(profile("alice")), storage)
    }

    fn internal_tx() -> mpsc::Sender<InternalEvent> {
        let (tx, _rx) = mpsc::channel();
        tx
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(panel: &mut TestPanel, view_data: &mut ViewData, code: KeyCode) -> Option<ExitReason> {
        handle_key_event(panel, view_data, &internal_tx(), key(code))
    }

    fn type_text(panel: &mut TestPanel, view_data: &mut ViewData, text: &str) {
        for ch in text.chars() {
            press(panel, view_data, KeyCode::Char(ch));
        }
    }

    #[test]
    fn s_opens_settings_and_esc_closes_it() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();

        press(&mut panel, &mut view_data, KeyCode::Char('s'));
        assert_eq!(panel.state().settings, SettingsVisibility::Visible);
        assert_eq!(
            view_data.transition.map(|transition| transition.direction),
            Some(TransitionDirection::Enter)
        );

        press(&mut panel, &mut view_data, KeyCode::Esc);
        assert_eq!(panel.state().settings, SettingsVisibility::Hidden);
        assert_eq!(
            view_data.transition.map(|transition| transition.direction),
            Some(TransitionDirection::Exit)
        );
    }

    #[test]
    fn enter_on_settings_entry_opens_overlay() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();

        assert_eq!(press(&mut panel, &mut view_data, KeyCode::Enter), None);
        assert!(panel.state().settings_visible());
    }

    #[test]
    fn typing_persists_every_keystroke() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();
        press(&mut panel, &mut view_data, KeyCode::Char('s'));

        type_text(&mut panel, &mut view_data, "sk-1");
        assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some("sk-1"));
        type_text(&mut panel, &mut view_data, "23");

        assert_eq!(panel.state().api_key, "sk-123");
        assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some("sk-123"));
    }

    #[test]
    fn q_is_text_while_settings_are_open() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();
        press(&mut panel, &mut view_data, KeyCode::Char('s'));

        assert_eq!(press(&mut panel, &mut view_data, KeyCode::Char('q')), None);
        assert_eq!(panel.state().api_key, "q");
    }

    #[test]
    fn backspace_persists_shortened_value() {
        let mut panel = panel_with(MemoryStorage::with_item(API_KEY_STORAGE_KEY, "sk-12"));
        panel.load_api_key();
        let mut view_data = ViewData::default();
        press(&mut panel, &mut view_data, KeyCode::Char('s'));

        press(&mut panel, &mut view_data, KeyCode::Backspace);
        assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), Some("sk-1"));
    }

    #[test]
    fn control_chords_do_not_edit_key() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();
        press(&mut panel, &mut view_data, KeyCode::Char('s'));

        handle_key_event(
            &mut panel,
            &mut view_data,
            &internal_tx(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
        );
        assert!(panel.state().api_key.is_empty());
        assert!(panel.storage().is_empty());
    }

    #[test]
    fn reset_button_clears_field_and_storage() {
        let mut panel = panel_with(MemoryStorage::with_item(API_KEY_STORAGE_KEY, "sk-test"));
        panel.load_api_key();
        let mut view_data = ViewData::default();
        press(&mut panel, &mut view_data, KeyCode::Char('s'));

        press(&mut panel, &mut view_data, KeyCode::Tab);
        assert_eq!(view_data.focus, SettingsFocus::Reset);
        press(&mut panel, &mut view_data, KeyCode::Enter);

        assert_eq!(panel.state().api_key, "");
        assert_eq!(panel.storage().item(API_KEY_STORAGE_KEY), None);
        assert!(panel.state().settings_visible());
    }

    #[test]
    fn logout_entry_signs_out_once_and_exits() {
        let backend = FakeBackend::with_profile(profile("alice"));
        let mut panel = ProfilePanel::new(backend.clone(), MemoryStorage::default());
        let mut view_data = ViewData::default();

        press(&mut panel, &mut view_data, KeyCode::Char('j'));
        let outcome = press(&mut panel, &mut view_data, KeyCode::Enter);

        assert_eq!(outcome, Some(ExitReason::SignedOut));
        assert_eq!(backend.sign_out_calls(), 1);
    }

    #[test]
    fn failed_logout_stays_in_panel() {
        let backend = FakeBackend::with_profile(profile("alice")).with_sign_out_error("offline");
        let mut panel = ProfilePanel::new(backend.clone(), MemoryStorage::default());
        let mut view_data = ViewData::default();

        press(&mut panel, &mut view_data, KeyCode::Down);
        assert_eq!(press(&mut panel, &mut view_data, KeyCode::Enter), None);
        assert_eq!(backend.sign_out_calls(), 1);
        assert_eq!(panel.state().status_line, None);
        assert_eq!(view_data.status_token, 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();

        press(&mut panel, &mut view_data, KeyCode::Up);
        assert_eq!(view_data.cursor, 0);
        for _ in 0..4 {
            press(&mut panel, &mut view_data, KeyCode::Down);
        }
        assert_eq!(view_data.cursor, 1);
    }

    #[test]
    fn quit_keys() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();

        assert_eq!(
            press(&mut panel, &mut view_data, KeyCode::Char('q')),
            Some(ExitReason::Quit)
        );
        assert_eq!(
            handle_key_event(
                &mut panel,
                &mut view_data,
                &internal_tx(),
                KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            ),
            Some(ExitReason::Quit)
        );
    }

    #[test]
    fn fetched_profile_fills_username() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();

        tx.send(InternalEvent::ProfileFetched(Ok(profile("alice"))))
            .expect("send should succeed");
        process_internal_events(&mut panel, &mut view_data, &tx, &rx);
        assert_eq!(panel.state().username(), "alice");
    }

    #[test]
    fn failed_fetch_leaves_username_empty() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();

        tx.send(InternalEvent::ProfileFetched(Err(anyhow!("server returned 500"))))
            .expect("send should succeed");
        process_internal_events(&mut panel, &mut view_data, &tx, &rx);
        assert_eq!(panel.state().username(), "");
        assert_eq!(panel.state().status_line, None);
        assert_eq!(view_data.status_token, 0);
    }

    #[test]
    fn stale_status_clear_is_ignored() {
        let mut panel = panel_with(MemoryStorage::default());
        let mut view_data = ViewData {
            status_token: 2,
            ..ViewData::default()
        };
        panel.reset_settings();
        let (tx, rx) = mpsc::channel();

        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("send should succeed");
        process_internal_events(&mut panel, &mut view_data, &tx, &rx);
        assert!(status_text(panel.state()).starts_with("settings reset | "));

        tx.send(InternalEvent::ClearStatus { token: 2 })
            .expect("send should succeed");
        process_internal_events(&mut panel, &mut view_data, &tx, &rx);
        assert!(panel.state().status_line.is_none());
    }

    #[test]
    fn spawned_fetch_reports_back_once() {
        let backend = FakeBackend::with_profile(profile("alice"));
        let (tx, rx) = mpsc::channel();

        spawn_profile_fetch(backend.clone(), tx);
        let event = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("fetch result should arrive");
        match event {
            InternalEvent::ProfileFetched(Ok(fetched)) => {
                assert_eq!(fetched.display_name(), "alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[test]
    fn panel_text_shows_username_and_cursor() {
        let state = PanelState {
            profile: Some(profile("alice")),
            ..PanelState::default()
        };
        let view_data = ViewData {
            cursor: 1,
            ..ViewData::default()
        };

        assert_eq!(
            render_panel_text(&state, &view_data),
            "alice\n\n  Settings\n› Logout"
        );
    }

    #[test]
    fn settings_text_uses_placeholder_for_empty_key() {
        let state = PanelState::default();
        let text = render_settings_overlay_text(&state, &ViewData::default());
        assert!(text.contains("› [sk-xxxxxxxxx]"));
        assert!(text.contains("Reset settings"));
        assert!(text.contains("new words"));

        let state = PanelState {
            api_key: "sk-test".to_owned(),
            ..PanelState::default()
        };
        let view_data = ViewData {
            focus: SettingsFocus::Reset,
            ..ViewData::default()
        };
        let text = render_settings_overlay_text(&state, &view_data);
        assert!(text.contains("  [sk-test]"));
        assert!(text.contains("› Reset settings"));
    }

    #[test]
    fn overlay_scales_in_and_out() {
        let start = Instant::now();
        let entering = ViewData {
            transition: Some(OverlayTransition {
                started: start,
                direction: TransitionDirection::Enter,
            }),
            ..ViewData::default()
        };

        let first = overlay_frame(true, &entering, start).expect("overlay should draw");
        assert!((first.scale - 0.9).abs() < 1e-9);
        assert!(first.faded);
        let settled = overlay_frame(true, &entering, start + TRANSITION).expect("overlay should draw");
        assert!((settled.scale - 1.0).abs() < 1e-9);
        assert!(!settled.faded);

        let leaving = ViewData {
            transition: Some(OverlayTransition {
                started: start,
                direction: TransitionDirection::Exit,
            }),
            ..ViewData::default()
        };
        let midway = overlay_frame(false, &leaving, start + TRANSITION / 2)
            .expect("closing overlay should still draw");
        assert!((midway.scale - 0.95).abs() < 1e-9);
        assert!(midway.faded);
        assert!(overlay_frame(false, &leaving, start + TRANSITION).is_none());
        assert!(overlay_frame(false, &ViewData::default(), start).is_none());
    }

    #[test]
    fn scaled_percent_stays_in_range() {
        assert_eq!(scaled_percent(60, 0.9), 54);
        assert_eq!(scaled_percent(60, 1.0), 60);
        assert_eq!(scaled_percent(0, 1.0), 1);
        assert_eq!(scaled_percent(100, 2.0), 100);
    }

    #[test]
    fn render_draws_username_and_overlay() -> anyhow::Result<()> {
        let mut state = PanelState {
            profile: Some(profile("alice")),
            ..PanelState::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24))?;
        let view_data = ViewData::default();

        terminal.draw(|frame| render(frame, &state, &view_data, Instant::now()))?;
        let screen = buffer_text(&terminal);
        assert!(screen.contains("alice"));
        assert!(screen.contains("Logout"));
        assert!(!screen.contains("OpenAI API Key"));

        state.settings = SettingsVisibility::Visible;
        terminal.draw(|frame| render(frame, &state, &view_data, Instant::now()))?;
        let screen = buffer_text(&terminal);
        assert!(screen.contains("OpenAI API Key"));
        assert!(screen.contains("Reset settings"));
        Ok(())
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}
