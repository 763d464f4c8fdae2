//! Navigation controller
//!
//! Single owner of `NavigationState`. Screens never write the state directly:
//! they call the named transitions below, and observers follow along through
//! a `watch` channel that receives exactly one update per transition.

use super::{NavigationError, NavigationState, Screen};
use crate::data::Pet;
use tokio::sync::watch;

pub struct NavigationController {
    state: NavigationState,
    publisher: watch::Sender<NavigationState>,
}

impl NavigationController {
    pub fn new() -> Self {
        let state = NavigationState::default();
        let (publisher, _) = watch::channel(state.clone());
        Self { state, publisher }
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_screen(&self) -> Screen {
        self.state.current_screen
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.state.active_pet.as_ref()
    }

    /// Unconditional transition. Entry requirements are the caller's business;
    /// use `enter` for the guarded variant.
    pub fn goto(&mut self, screen: Screen) {
        self.state.current_screen = screen;
        self.publish();
    }

    /// Guarded transition used by input handlers
    pub fn enter(&mut self, screen: Screen) -> Result<(), NavigationError> {
        if screen.requires_pet() && self.state.active_pet.is_none() {
            tracing::debug!(%screen, "Rejected navigation without an active pet");
            return Err(NavigationError::PetRequired(screen));
        }
        self.goto(screen);
        Ok(())
    }

    /// Make `pet` the context and open its profile in one update
    pub fn select_pet(&mut self, pet: Pet) {
        tracing::debug!(pet = %pet.id, "Pet selected");
        self.state.active_pet = Some(pet);
        self.state.current_screen = Screen::PetProfile;
        self.publish();
    }

    /// Top-bar back: see `NavigationState::back_target`
    pub fn go_back(&mut self) {
        let target = self.state.back_target();
        self.goto(target);
    }

    pub fn back_target(&self) -> Screen {
        self.state.back_target()
    }

    /// Bottom tab bar. Going home drops the pet context so the dashboard
    /// never silently re-enters a pet.
    pub fn on_primary_tab_change(&mut self, screen: Screen) {
        if screen == Screen::Dashboard {
            self.state.active_pet = None;
        }
        self.goto(screen);
    }

    pub fn login(&mut self) {
        self.goto(Screen::Onboarding);
    }

    pub fn complete_onboarding(&mut self) {
        self.goto(Screen::Dashboard);
    }

    pub fn logout(&mut self) {
        self.goto(Screen::Auth);
    }

    pub fn show_bottom_bar(&self) -> bool {
        self.state.current_screen.show_bottom_bar()
    }

    pub fn show_top_bar(&self) -> bool {
        self.state.current_screen.show_top_bar()
    }

    pub fn top_bar_title(&self) -> &'static str {
        self.state.current_screen.top_bar_title()
    }

    fn publish(&self) {
        tracing::trace!(
            screen = %self.state.current_screen,
            pet = self.state.active_pet.as_ref().map(|p| p.id.as_str()),
            "Navigation state changed"
        );
        // send_replace stores the value even when nobody is subscribed
        self.publisher.send_replace(self.state.clone());
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;

    fn buddy() -> Pet {
        Dataset::mock().pet("p1").cloned().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let nav = NavigationController::new();
        assert_eq!(nav.current_screen(), Screen::Auth);
        assert!(nav.active_pet().is_none());
        assert!(!nav.show_bottom_bar());
    }

    #[test]
    fn test_select_pet_then_back_returns_to_profile() {
        let mut nav = NavigationController::new();
        nav.select_pet(buddy());
        nav.goto(Screen::HealthRecords);
        nav.go_back();
        assert_eq!(nav.current_screen(), Screen::PetProfile);
        assert_eq!(nav.active_pet().map(|p| p.name.as_str()), Some("Buddy"));

        // Back on the profile itself stays on the profile
        nav.go_back();
        assert_eq!(nav.current_screen(), Screen::PetProfile);
    }

    #[test]
    fn test_back_without_pet_goes_home() {
        let mut nav = NavigationController::new();
        nav.goto(Screen::Calendar);
        nav.go_back();
        assert_eq!(nav.current_screen(), Screen::Dashboard);
    }

    #[test]
    fn test_back_from_profile_goes_to_settings() {
        let mut nav = NavigationController::new();
        nav.select_pet(buddy());
        nav.goto(Screen::UserProfile);
        nav.go_back();
        assert_eq!(nav.current_screen(), Screen::Settings);
    }

    #[test]
    fn test_home_tab_clears_pet() {
        let mut nav = NavigationController::new();
        nav.select_pet(buddy());
        nav.on_primary_tab_change(Screen::Dashboard);
        assert!(nav.active_pet().is_none());
        assert_eq!(nav.current_screen(), Screen::Dashboard);

        // Already clear: stays clear
        nav.on_primary_tab_change(Screen::Dashboard);
        assert!(nav.active_pet().is_none());
    }

    #[test]
    fn test_other_tabs_keep_pet() {
        let mut nav = NavigationController::new();
        nav.select_pet(buddy());
        nav.on_primary_tab_change(Screen::AiHub);
        assert_eq!(nav.current_screen(), Screen::AiHub);
        assert!(nav.active_pet().is_some());
    }

    #[test]
    fn test_enter_guards_pet_profile() {
        let mut nav = NavigationController::new();
        nav.goto(Screen::Dashboard);
        assert_eq!(
            nav.enter(Screen::PetProfile),
            Err(NavigationError::PetRequired(Screen::PetProfile))
        );
        assert_eq!(nav.current_screen(), Screen::Dashboard);

        // AI hub works without a pet (generic greeting)
        assert!(nav.enter(Screen::AiHub).is_ok());

        nav.select_pet(buddy());
        nav.goto(Screen::Dashboard);
        assert!(nav.enter(Screen::PetProfile).is_ok());
    }

    #[test]
    fn test_lifecycle_shortcuts() {
        let mut nav = NavigationController::new();
        nav.login();
        assert_eq!(nav.current_screen(), Screen::Onboarding);
        nav.complete_onboarding();
        assert_eq!(nav.current_screen(), Screen::Dashboard);
        assert!(nav.show_bottom_bar());
        nav.logout();
        assert_eq!(nav.current_screen(), Screen::Auth);
    }

    #[test]
    fn test_any_sequence_stays_on_known_screen() {
        let mut nav = NavigationController::new();
        let pet = buddy();

        // Deterministic walk over every operation and target
        for (i, screen) in Screen::ALL.iter().cycle().take(60).enumerate() {
            match i % 4 {
                0 => nav.goto(*screen),
                1 => nav.select_pet(pet.clone()),
                2 => nav.go_back(),
                _ => nav.on_primary_tab_change(*screen),
            }
            assert!(Screen::ALL.contains(&nav.current_screen()));
            if nav.current_screen() == Screen::PetProfile {
                assert!(nav.active_pet().is_some());
            }
        }
    }

    #[test]
    fn test_subscribers_see_single_update_for_select_pet() {
        let mut nav = NavigationController::new();
        let mut rx = nav.subscribe();
        assert!(!rx.has_changed().unwrap());

        nav.select_pet(buddy());
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.current_screen, Screen::PetProfile);
        assert!(seen.active_pet.is_some());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_derived_bars_follow_screen() {
        let mut nav = NavigationController::new();
        nav.goto(Screen::Settings);
        assert!(nav.show_top_bar());
        assert!(nav.show_bottom_bar());
        assert_eq!(nav.top_bar_title(), "Settings");

        nav.goto(Screen::AiHub);
        assert!(!nav.show_top_bar());
    }
}
