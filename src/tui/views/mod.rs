// Views module - screen-level rendering logic
//
// The shell is fixed: optional top bar, the current screen's content,
// optional bottom tab bar, and a one-line status/help footer. Which bars are
// shown comes straight from the navigation state.

mod ai_hub;
mod auth;
mod dashboard;
mod pet_profile;
mod records;
mod settings;

use super::app::App;
use crate::nav::Screen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let screen = app.screen();
    let mut constraints = Vec::new();
    if screen.show_top_bar() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(8));
    if screen.show_bottom_bar() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut slots = chunks.iter().copied();
    if screen.show_top_bar() {
        if let Some(area) = slots.next() {
            render_top_bar(f, area, app);
        }
    }
    if let Some(area) = slots.next() {
        render_content(f, area, app);
    }
    if screen.show_bottom_bar() {
        if let Some(area) = slots.next() {
            render_tab_bar(f, area, app);
        }
    }
    if let Some(area) = slots.next() {
        render_status(f, area, app);
    }

    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }
    app.clear_expired_toast();
}

fn render_content(f: &mut Frame, area: Rect, app: &App) {
    match app.screen() {
        Screen::Auth => auth::render_auth(f, area, app),
        Screen::Onboarding => auth::render_onboarding(f, area, app),
        Screen::Dashboard => dashboard::render(f, area, app),
        Screen::PetProfile => pet_profile::render(f, area, app),
        Screen::AiHub => ai_hub::render(f, area, app),
        Screen::HealthRecords => records::render_health(f, area, app),
        Screen::TrainingLogs => records::render_training(f, area, app),
        Screen::Calendar => records::render_calendar(f, area, app),
        Screen::Settings => settings::render(f, area, app),
        Screen::UserProfile => settings::render_user_profile(f, area, app),
    }
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let screen = app.screen();
    let theme = &app.theme;

    let mut spans = Vec::new();
    if screen.top_bar_has_back() {
        spans.push(Span::styled("← ", theme.muted()));
    }
    spans.push(Span::styled(app.nav.top_bar_title(), theme.title()));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(bar, area);
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let titles: Vec<Line> = Screen::PRIMARY_TABS
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{} {}", i + 1, screen.label())))
        .collect();

    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(theme.muted())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");

    // Pet profile and records sit outside the tab set
    if let Some(index) = app.screen().tab_index() {
        tabs = tabs.select(index);
    }
    f.render_widget(tabs, area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let hints = match app.screen() {
        Screen::Auth => "Enter sign in · Ctrl+C quit",
        Screen::Onboarding => "Enter get started · Ctrl+C quit",
        Screen::Dashboard => "←/→ pet · Enter open · ↑/↓ task · Space done · 1-5 tabs · q quit",
        Screen::PetProfile => "r health · t training · c calendar · a ask AI · Esc home",
        Screen::AiHub => "Enter send · Esc clear · F1-F5 tabs · Ctrl+C quit",
        Screen::Settings => "p profile · t theme · x log out · 1-5 tabs · q quit",
        _ => "Esc back · 1-5 tabs · q quit",
    };

    let status = Paragraph::new(hints)
        .style(app.theme.muted())
        .alignment(Alignment::Center);
    f.render_widget(status, area);
}

/// Rounded card used by most screens
pub(super) fn card<'a>(title: impl Into<Line<'a>>, app: &App) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border))
        .title(title)
}

/// "2024-05-20" -> "May 20"; anything unparsable is shown as-is
pub(super) fn short_date(iso: &str) -> String {
    chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::OfflineAdvisor;
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn render_to_text(app: &mut App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-05-20"), "May 20");
        assert_eq!(short_date("soon"), "soon");
    }

    #[test]
    fn test_every_screen_renders() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), LogBuffer::new(), Arc::new(OfflineAdvisor), tx);
        let buddy = app.data.pet("p1").cloned().unwrap();
        app.nav.select_pet(buddy);

        for screen in Screen::ALL {
            app.nav.goto(screen);
            let state = app.nav.state().clone();
            app.on_navigation(&state);
            let text = render_to_text(&mut app);
            assert_eq!(text.contains("Settings"), screen.show_bottom_bar(), "{screen}");
        }
    }

    #[test]
    fn test_top_bar_titles() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), LogBuffer::new(), Arc::new(OfflineAdvisor), tx);

        app.nav.goto(Screen::HealthRecords);
        assert!(render_to_text(&mut app).contains("Health Records"));

        app.nav.goto(Screen::AiHub);
        let state = app.nav.state().clone();
        app.on_navigation(&state);
        let text = render_to_text(&mut app);
        assert!(text.contains("LLM Hub"));
        assert!(text.contains("Hi! I'm your"));
    }
}
