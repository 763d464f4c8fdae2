// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, navigation changes, advice replies, ticks)
// - Mapping keys onto app actions

pub mod app;
pub mod theme;
pub mod toast;
pub mod views;

use crate::advice::AdviceGenerator;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::nav::{NavigationState, Screen};
use anyhow::{Context, Result};
use app::{AdviceReply, App};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Run the TUI until the user quits
pub async fn run_tui(
    config: Config,
    log_buffer: LogBuffer,
    advisor: Arc<dyn AdviceGenerator>,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, log_buffer, advisor, reply_tx);
    let mut nav_rx = app.nav.subscribe();

    let result = run_event_loop(&mut terminal, &mut app, &mut nav_rx, &mut reply_rx).await;

    // Restore terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// One wake-up of the event loop
enum LoopEvent {
    Navigation(NavigationState),
    Reply(AdviceReply),
    Key(Option<KeyEvent>),
    Tick,
}

/// Wait for the next thing the loop has to react to
///
/// Sources, in priority order:
/// 1. Navigation changes (keeps the chat session in step with the screen)
/// 2. Advice replies from spawned requests
/// 3. Timer ticks (spinner, toast expiry)
/// 4. Keyboard input
///
/// `poll_key` completes on its first poll, so anything ordered after it in a
/// biased select would never run; ticks go first and only win when due.
async fn next_event(
    nav_rx: &mut watch::Receiver<NavigationState>,
    reply_rx: &mut mpsc::UnboundedReceiver<AdviceReply>,
    tick_interval: &mut tokio::time::Interval,
    poll_key: impl FnOnce() -> Option<KeyEvent>,
) -> LoopEvent {
    tokio::select! {
        biased;

        Ok(()) = nav_rx.changed() => {
            LoopEvent::Navigation(nav_rx.borrow_and_update().clone())
        }

        Some(reply) = reply_rx.recv() => LoopEvent::Reply(reply),

        _ = tick_interval.tick() => LoopEvent::Tick,

        key = async { poll_key() } => LoopEvent::Key(key),
    }
}

fn poll_terminal_key() -> Option<KeyEvent> {
    if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(Event::Key(key_event)) => Some(key_event),
        _ => None,
    }
}

/// Main event loop
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    nav_rx: &mut watch::Receiver<NavigationState>,
    reply_rx: &mut mpsc::UnboundedReceiver<AdviceReply>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        match next_event(nav_rx, reply_rx, &mut tick_interval, poll_terminal_key).await {
            LoopEvent::Navigation(state) => app.on_navigation(&state),
            LoopEvent::Reply(reply) => app.on_advice_reply(reply),
            LoopEvent::Key(Some(key_event)) => handle_key_event(app, key_event),
            LoopEvent::Key(None) => {}
            LoopEvent::Tick => app.tick_animation(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Global → Screen-specific
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Release/repeat events are reported on some terminals only
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if handle_global_keys(app, &key_event) {
        return;
    }

    match app.screen() {
        Screen::Auth => {
            if key_event.code == KeyCode::Enter {
                app.nav.login();
            }
        }
        Screen::Onboarding => {
            if key_event.code == KeyCode::Enter {
                app.nav.complete_onboarding();
            }
        }
        // The hub captures printable keys for the input line
        Screen::AiHub => handle_ai_hub_keys(app, key_event.code),
        screen => {
            if !handle_shortcut_keys(app, key_event.code) {
                handle_screen_keys(app, screen, key_event.code);
            }
        }
    }
}

/// Keys that work on every screen
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            true
        }
        KeyCode::F(n @ 1..=5) => {
            app.switch_tab(usize::from(n - 1));
            true
        }
        KeyCode::Tab => {
            app.cycle_tab(true);
            true
        }
        KeyCode::BackTab => {
            app.cycle_tab(false);
            true
        }
        _ => false,
    }
}

/// Single-letter shortcuts, unavailable while typing in the hub
fn handle_shortcut_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.should_quit = true;
            true
        }
        KeyCode::Char(c @ '1'..='5') => {
            app.switch_tab(c as usize - '1' as usize);
            true
        }
        _ => false,
    }
}

fn handle_screen_keys(app: &mut App, screen: Screen, code: KeyCode) {
    match (screen, code) {
        (Screen::Dashboard, KeyCode::Left | KeyCode::Char('h')) => app.select_prev_pet(),
        (Screen::Dashboard, KeyCode::Right | KeyCode::Char('l')) => app.select_next_pet(),
        (Screen::Dashboard, KeyCode::Up | KeyCode::Char('k')) => app.select_prev_task(),
        (Screen::Dashboard, KeyCode::Down | KeyCode::Char('j')) => app.select_next_task(),
        (Screen::Dashboard, KeyCode::Enter) => app.open_selected_pet(),
        (Screen::Dashboard, KeyCode::Char(' ')) => app.toggle_selected_task(),

        // Pet profile management tiles
        (Screen::PetProfile, KeyCode::Char('r')) => app.open(Screen::HealthRecords),
        (Screen::PetProfile, KeyCode::Char('t')) => app.open(Screen::TrainingLogs),
        (Screen::PetProfile, KeyCode::Char('c')) => app.open(Screen::Calendar),
        (Screen::PetProfile, KeyCode::Char('a')) => app.open(Screen::AiHub),
        // The profile's own back button returns home and keeps the pet
        (Screen::PetProfile, KeyCode::Esc | KeyCode::Backspace) => app.nav.goto(Screen::Dashboard),

        (Screen::Settings, KeyCode::Char('p') | KeyCode::Enter) => app.open(Screen::UserProfile),
        (Screen::Settings, KeyCode::Char('t')) => app.toggle_theme(),
        (Screen::Settings, KeyCode::Char('x')) => app.logout(),

        (screen, KeyCode::Esc | KeyCode::Backspace) if screen.top_bar_has_back() => {
            app.nav.go_back()
        }
        _ => {}
    }
}

fn handle_ai_hub_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Esc => app.input.clear(),
        KeyCode::Char(c) => app.push_input(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::OfflineAdvisor;

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Config::default(), LogBuffer::new(), Arc::new(OfflineAdvisor), tx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_ticks_fire_while_keys_are_idle() {
        let mut app = app();
        let mut nav_rx = app.nav.subscribe();
        let (_reply_tx, mut reply_rx) = mpsc::unbounded_channel();
        let mut tick_interval = tokio::time::interval(Duration::from_millis(5));
        let start = app.spinner();

        let mut ticks = 0;
        let deadline = tokio::time::Instant::now() + Duration::from_millis(300);
        while ticks < 2 && tokio::time::Instant::now() < deadline {
            if let LoopEvent::Tick =
                next_event(&mut nav_rx, &mut reply_rx, &mut tick_interval, || None).await
            {
                ticks += 1;
                app.tick_animation();
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(ticks, 2);
        assert_ne!(app.spinner(), start);
    }

    #[tokio::test]
    async fn test_navigation_change_is_reported_first() {
        let mut app = app();
        let mut nav_rx = app.nav.subscribe();
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
        let mut tick_interval = tokio::time::interval(Duration::from_millis(5));

        app.nav.goto(Screen::AiHub);
        let ticket = app.chat.session_for(None).begin_send("hi").unwrap().ticket;
        reply_tx
            .send(AdviceReply { ticket, text: "hello".to_string() })
            .unwrap();

        let first = next_event(&mut nav_rx, &mut reply_rx, &mut tick_interval, || None).await;
        assert!(matches!(first, LoopEvent::Navigation(ref s) if s.current_screen == Screen::AiHub));
        let second = next_event(&mut nav_rx, &mut reply_rx, &mut tick_interval, || None).await;
        assert!(matches!(second, LoopEvent::Reply(_)));
    }

    #[test]
    fn test_sign_in_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen(), Screen::Auth);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Onboarding);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_pet_profile_to_records_and_back() {
        let mut app = app();
        app.nav.goto(Screen::Dashboard);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::PetProfile);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.screen(), Screen::HealthRecords);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::PetProfile);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(app.nav.active_pet().is_some());
    }

    #[test]
    fn test_settings_has_no_back_but_profile_does() {
        let mut app = app();
        app.nav.goto(Screen::Dashboard);
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.screen(), Screen::Settings);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Settings);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.screen(), Screen::UserProfile);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Settings);
    }

    #[test]
    fn test_hub_captures_letters() {
        let mut app = app();
        app.nav.goto(Screen::AiHub);

        for c in ['q', '1', 'h', 'i'] {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        assert_eq!(app.screen(), Screen::AiHub);
        assert_eq!(app.input, "q1hi");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "q1h");
        press(&mut app, KeyCode::Esc);
        assert!(app.input.is_empty());

        // F-keys still switch tabs
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);

        let mut app = self::app();
        app.nav.goto(Screen::Calendar);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = app();
        let mut event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        handle_key_event(&mut app, event);
        assert_eq!(app.screen(), Screen::Auth);
    }
}
