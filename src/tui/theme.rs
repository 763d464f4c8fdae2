// Theme for the TUI
//
// Two palettes, switchable at runtime from the Settings screen.

use crate::logging::LogLevel;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    /// Brand color: titles, active tab, user chat bubbles
    pub accent: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub success: Color,
    pub danger: Color,

    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::Gray,
            border: Color::DarkGray,
            accent: Color::Rgb(129, 140, 248), // indigo-400
            selection: Color::DarkGray,
            selection_fg: Color::Yellow,
            success: Color::Green,
            danger: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
            log_trace: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::DarkGray,
            border: Color::Gray,
            accent: Color::Rgb(79, 70, 229), // indigo-600
            selection: Color::Rgb(224, 231, 255),
            selection_fg: Color::Black,
            success: Color::Rgb(16, 185, 129),
            danger: Color::Rgb(239, 68, 68),

            log_error: Color::Red,
            log_warn: Color::Rgb(184, 134, 11), // Dark goldenrod
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
            log_trace: Color::Gray,
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn log_level(&self, level: LogLevel) -> Style {
        let color = match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug => self.log_debug,
            LogLevel::Trace => self.log_trace,
        };
        Style::default().fg(color)
    }
}
