// Navigation module - which screen is visible and which pet is in context
//
// The screen set is a closed enum, so every transition is total. Derived chrome
// (top bar, bottom bar, titles) is a pure function of the current screen.

mod controller;

pub use controller::NavigationController;

use crate::data::Pet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One full-page view of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Auth,
    Onboarding,
    Dashboard,
    PetProfile,
    AiHub,
    HealthRecords,
    TrainingLogs,
    Calendar,
    Settings,
    UserProfile,
}

impl Screen {
    pub const ALL: [Screen; 10] = [
        Screen::Auth,
        Screen::Onboarding,
        Screen::Dashboard,
        Screen::PetProfile,
        Screen::AiHub,
        Screen::HealthRecords,
        Screen::TrainingLogs,
        Screen::Calendar,
        Screen::Settings,
        Screen::UserProfile,
    ];

    /// Bottom tab bar entries, left to right
    pub const PRIMARY_TABS: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Calendar,
        Screen::AiHub,
        Screen::TrainingLogs,
        Screen::Settings,
    ];

    /// Bottom tab bar is hidden until the user is signed in and onboarded
    pub fn show_bottom_bar(self) -> bool {
        !matches!(self, Screen::Auth | Screen::Onboarding)
    }

    /// Screens without their own header get the shared top bar
    pub fn show_top_bar(self) -> bool {
        matches!(
            self,
            Screen::HealthRecords
                | Screen::TrainingLogs
                | Screen::Calendar
                | Screen::Settings
                | Screen::UserProfile
        )
    }

    /// Settings is a root tab: top bar but no back arrow
    pub fn top_bar_has_back(self) -> bool {
        self.show_top_bar() && self != Screen::Settings
    }

    pub fn top_bar_title(self) -> &'static str {
        match self {
            Screen::HealthRecords => "Health Records",
            Screen::TrainingLogs => "Training",
            Screen::Calendar => "Calendar",
            Screen::Settings => "Settings",
            Screen::UserProfile => "My Profile",
            _ => "PetPal",
        }
    }

    /// Index of the highlighted bottom tab, if any
    pub fn tab_index(self) -> Option<usize> {
        match self {
            // Profile lives under the Settings tab
            Screen::UserProfile => Some(4),
            other => Screen::PRIMARY_TABS.iter().position(|s| *s == other),
        }
    }

    /// Short label for tabs and logs
    pub fn label(self) -> &'static str {
        match self {
            Screen::Auth => "Sign in",
            Screen::Onboarding => "Welcome",
            Screen::Dashboard => "Home",
            Screen::PetProfile => "Pet",
            Screen::AiHub => "Ask AI",
            Screen::HealthRecords => "Health",
            Screen::TrainingLogs => "Training",
            Screen::Calendar => "Calendar",
            Screen::Settings => "Settings",
            Screen::UserProfile => "Profile",
        }
    }

    /// Whether entering this screen needs a pet in context
    pub fn requires_pet(self) -> bool {
        self == Screen::PetProfile
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Snapshot published to subscribers after every transition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationState {
    pub current_screen: Screen,
    pub active_pet: Option<Pet>,
}

impl NavigationState {
    /// Where "back" leads from here. No history is kept: the answer depends
    /// only on the current screen and whether a pet is in context.
    pub fn back_target(&self) -> Screen {
        match self.current_screen {
            Screen::UserProfile => Screen::Settings,
            _ if self.active_pet.is_some() => Screen::PetProfile,
            _ => Screen::Dashboard,
        }
    }
}

/// Rejected guarded transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// The target screen needs an active pet and none is selected
    PetRequired(Screen),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PetRequired(screen) => write!(f, "{} requires a selected pet", screen),
        }
    }
}

impl std::error::Error for NavigationError {}
