// TUI application state
//
// Owns the navigation controller, the chat session cache and the dataset,
// plus the purely visual bits (selection, input line, toast). Every user
// action is a method here so the key handlers in `mod.rs` stay a thin
// mapping and the behavior is testable without a terminal.

use super::theme::{Theme, ThemeKind};
use super::toast::{Toast, ToastKind};
use crate::advice::AdviceGenerator;
use crate::chat::{AdviceTicket, ChatSession, Rejection, SessionCache};
use crate::config::Config;
use crate::data::Dataset;
use crate::logging::LogBuffer;
use crate::nav::{NavigationController, NavigationState, Screen};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Spinner shown while a reply is outstanding
const SPINNER: [&str; 4] = ["·  ", "·· ", "···", " ··"];

/// Reply from a spawned advice call, routed back to the event loop
#[derive(Debug)]
pub struct AdviceReply {
    pub ticket: AdviceTicket,
    pub text: String,
}

pub struct App {
    pub nav: NavigationController,
    pub chat: SessionCache,
    pub data: Dataset,
    pub config: Config,
    pub log_buffer: LogBuffer,

    pub theme: Theme,
    pub theme_kind: ThemeKind,

    /// AI hub input line
    pub input: String,
    /// Dashboard pet card under the cursor
    pub selected_pet: usize,
    /// Dashboard task row under the cursor
    pub selected_task: usize,

    pub toast: Option<Toast>,
    pub should_quit: bool,
    animation_frame: usize,

    advisor: Arc<dyn AdviceGenerator>,
    reply_tx: mpsc::UnboundedSender<AdviceReply>,
}

impl App {
    pub fn new(
        config: Config,
        log_buffer: LogBuffer,
        advisor: Arc<dyn AdviceGenerator>,
        reply_tx: mpsc::UnboundedSender<AdviceReply>,
    ) -> Self {
        let theme_kind = ThemeKind::default();
        Self {
            nav: NavigationController::new(),
            chat: SessionCache::new(),
            data: Dataset::mock(),
            config,
            log_buffer,
            theme: theme_kind.theme(),
            theme_kind,
            input: String::new(),
            selected_pet: 0,
            selected_task: 0,
            toast: None,
            should_quit: false,
            animation_frame: 0,
            advisor,
            reply_tx,
        }
    }

    pub fn screen(&self) -> Screen {
        self.nav.current_screen()
    }

    pub fn advisor_name(&self) -> &'static str {
        self.advisor.name()
    }

    pub fn advisor_ready(&self) -> bool {
        self.advisor.is_ready()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    /// Follow a published navigation state: the AI hub holds a session for
    /// the active pet, every other screen holds none.
    pub fn on_navigation(&mut self, state: &NavigationState) {
        if state.current_screen == Screen::AiHub {
            self.chat.session_for(state.active_pet.as_ref());
        } else {
            self.chat.discard();
            self.input.clear();
        }
    }

    /// Bottom tab bar selection by position
    pub fn switch_tab(&mut self, index: usize) {
        if !self.nav.show_bottom_bar() {
            return;
        }
        if let Some(&screen) = Screen::PRIMARY_TABS.get(index) {
            self.nav.on_primary_tab_change(screen);
        }
    }

    /// Move to the neighbouring tab, wrapping around
    pub fn cycle_tab(&mut self, forward: bool) {
        let Some(current) = self.screen().tab_index() else {
            return;
        };
        let len = Screen::PRIMARY_TABS.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.switch_tab(next);
    }

    /// Enter a screen from a pet-scoped action, reporting a missing pet
    pub fn open(&mut self, screen: Screen) {
        if let Err(e) = self.nav.enter(screen) {
            self.toast = Some(Toast::from(&e));
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dashboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn select_next_pet(&mut self) {
        let count = self.data.pets().len();
        if count > 0 {
            self.selected_pet = (self.selected_pet + 1) % count;
        }
    }

    pub fn select_prev_pet(&mut self) {
        let count = self.data.pets().len();
        if count > 0 {
            self.selected_pet = (self.selected_pet + count - 1) % count;
        }
    }

    /// Open the profile of the highlighted pet
    pub fn open_selected_pet(&mut self) {
        if let Some(pet) = self.data.pets().get(self.selected_pet).cloned() {
            self.nav.select_pet(pet);
        }
    }

    pub fn select_next_task(&mut self) {
        let count = self.data.tasks().len();
        if count > 0 {
            self.selected_task = (self.selected_task + 1).min(count - 1);
        }
    }

    pub fn select_prev_task(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn toggle_selected_task(&mut self) {
        let Some(id) = self.data.tasks().get(self.selected_task).map(|t| t.id.clone()) else {
            return;
        };
        if let Some(true) = self.data.toggle_task(&id) {
            self.show_toast(ToastKind::Success, "Task done");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // AI hub
    // ─────────────────────────────────────────────────────────────────────

    pub fn chat_session(&self) -> Option<&ChatSession> {
        self.chat.current()
    }

    /// "Chat about Buddy" with a pet, "LLM Hub" without
    pub fn chat_title(&self) -> String {
        match self.nav.active_pet() {
            Some(pet) => format!("Chat about {}", pet.name),
            None => "LLM Hub".to_string(),
        }
    }

    pub fn input_placeholder(&self) -> String {
        match self.nav.active_pet() {
            Some(pet) => format!("Ask about {}...", pet.name),
            None => "Type your question...".to_string(),
        }
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Send the input line. The advice call runs on its own task and comes
    /// back through the reply channel; the input is kept when the send is
    /// refused so nothing typed is lost.
    pub fn submit_input(&mut self) {
        if self.screen() != Screen::AiHub {
            return;
        }

        let pet = self.nav.active_pet().cloned();
        let session = self.chat.session_for(pet.as_ref());
        let request = match session.begin_send(&self.input) {
            Ok(request) => request,
            Err(Rejection::EmptyText) => return,
            Err(rejection @ Rejection::Pending) => {
                self.toast = Some(Toast::from(rejection));
                return;
            }
        };
        self.input.clear();

        let advisor = Arc::clone(&self.advisor);
        let reply_tx = self.reply_tx.clone();
        tokio::spawn(async move {
            let text = advisor
                .generate_advice(&request.text, request.pet.as_ref(), &request.history)
                .await;
            // Receiver gone means the app is shutting down
            let _ = reply_tx.send(AdviceReply {
                ticket: request.ticket,
                text,
            });
        });
    }

    pub fn on_advice_reply(&mut self, reply: AdviceReply) {
        if !self.chat.apply_reply(reply.ticket, reply.text) {
            tracing::debug!(ticket = ?reply.ticket, "Advice reply arrived after its chat was closed");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn toggle_theme(&mut self) {
        self.theme_kind = self.theme_kind.toggle();
        self.theme = self.theme_kind.theme();
        self.show_toast(ToastKind::Info, format!("Theme: {}", self.theme_kind.name()));
    }

    pub fn logout(&mut self) {
        tracing::info!("Logged out");
        self.selected_pet = 0;
        self.selected_task = 0;
        self.nav.logout();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame housekeeping
    // ─────────────────────────────────────────────────────────────────────

    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    pub fn show_toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast::new(kind, message));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{OfflineAdvisor, OFFLINE_REPLY};
    use crate::chat::Role;

    fn app() -> (App, mpsc::UnboundedReceiver<AdviceReply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            Config::default(),
            LogBuffer::new(),
            Arc::new(OfflineAdvisor),
            tx,
        );
        (app, rx)
    }

    /// Apply the controller's latest state the way the event loop does
    fn sync(app: &mut App) {
        let state = app.nav.state().clone();
        app.on_navigation(&state);
    }

    #[test]
    fn test_tabs_ignored_before_login() {
        let (mut app, _rx) = app();
        app.switch_tab(2);
        assert_eq!(app.screen(), Screen::Auth);

        app.nav.login();
        app.nav.complete_onboarding();
        app.switch_tab(2);
        assert_eq!(app.screen(), Screen::AiHub);
    }

    #[test]
    fn test_cycle_tab_wraps() {
        let (mut app, _rx) = app();
        app.nav.goto(Screen::Dashboard);
        app.cycle_tab(false);
        assert_eq!(app.screen(), Screen::Settings);
        app.cycle_tab(true);
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_open_pet_screen_without_pet_shows_toast() {
        let (mut app, _rx) = app();
        app.nav.goto(Screen::Dashboard);
        app.open(Screen::PetProfile);
        assert_eq!(app.screen(), Screen::Dashboard);
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Refused));
    }

    #[test]
    fn test_dashboard_selection_opens_pet() {
        let (mut app, _rx) = app();
        app.nav.goto(Screen::Dashboard);
        app.select_next_pet();
        app.open_selected_pet();
        assert_eq!(app.screen(), Screen::PetProfile);
        assert_eq!(app.nav.active_pet().map(|p| p.name.as_str()), Some("Luna"));

        // wraps
        app.select_next_pet();
        assert_eq!(app.selected_pet, 0);
        app.select_prev_pet();
        assert_eq!(app.selected_pet, 1);
    }

    #[test]
    fn test_toggle_selected_task() {
        let (mut app, _rx) = app();
        app.select_next_task();
        let before = app.data.pending_task_count();
        app.toggle_selected_task();
        assert_eq!(app.data.pending_task_count(), before - 1);

        for _ in 0..10 {
            app.select_next_task();
        }
        assert_eq!(app.selected_task, app.data.tasks().len() - 1);
    }

    #[test]
    fn test_session_follows_navigation() {
        let (mut app, _rx) = app();
        let buddy = app.data.pet("p1").cloned().unwrap();

        app.nav.select_pet(buddy);
        app.nav.goto(Screen::AiHub);
        sync(&mut app);
        assert_eq!(app.chat_title(), "Chat about Buddy");
        let session = app.chat_session().unwrap();
        assert!(session.messages()[0].text.contains("Buddy"));

        app.nav.on_primary_tab_change(Screen::Calendar);
        sync(&mut app);
        assert!(app.chat_session().is_none());
    }

    #[tokio::test]
    async fn test_submit_round_trip_through_channel() {
        let (mut app, mut rx) = app();
        app.nav.goto(Screen::AiHub);
        sync(&mut app);

        for c in "Can dogs eat grapes?".chars() {
            app.push_input(c);
        }
        app.submit_input();
        assert!(app.input.is_empty());
        assert!(app.chat_session().unwrap().is_pending());

        // Second send while pending is refused and keeps the text
        app.push_input('x');
        app.submit_input();
        assert_eq!(app.input, "x");
        assert_eq!(app.toast.as_ref().map(|t| t.kind), Some(ToastKind::Refused));

        let reply = rx.recv().await.unwrap();
        app.on_advice_reply(reply);

        let session = app.chat_session().unwrap();
        assert!(!session.is_pending());
        assert_eq!(session.messages().len(), 3);
        let last = session.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text, OFFLINE_REPLY);
    }

    #[tokio::test]
    async fn test_reply_after_leaving_hub_is_dropped() {
        let (mut app, mut rx) = app();
        app.nav.goto(Screen::AiHub);
        sync(&mut app);
        app.input = "hello".to_string();
        app.submit_input();

        app.nav.on_primary_tab_change(Screen::Dashboard);
        sync(&mut app);
        app.nav.goto(Screen::AiHub);
        sync(&mut app);

        let reply = rx.recv().await.unwrap();
        app.on_advice_reply(reply);

        // Fresh session: greeting only, not waiting on anything
        let session = app.chat_session().unwrap();
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_blank_submit_is_silent() {
        let (mut app, _rx) = app();
        app.nav.goto(Screen::AiHub);
        sync(&mut app);
        app.input = "   ".to_string();
        app.submit_input();
        assert_eq!(app.chat_session().unwrap().messages().len(), 1);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_logout_returns_to_auth() {
        let (mut app, _rx) = app();
        app.nav.goto(Screen::Settings);
        app.logout();
        assert_eq!(app.screen(), Screen::Auth);
        assert!(!app.nav.show_bottom_bar());
    }
}
