// Sign-in and onboarding screens

use super::card;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Centered box of the given size inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

pub fn render_auth(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let field = |label: &'static str| {
        Line::from(vec![
            Span::styled(format!("{label:<10}"), theme.muted()),
            Span::styled("________________________", Style::default().fg(theme.border)),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("🐾 PetPal", theme.title())).alignment(Alignment::Center),
        Line::from(Span::styled("Manage your furry friends with AI", theme.muted()))
            .alignment(Alignment::Center),
        Line::from(""),
        field("Email"),
        field("Password"),
        Line::from(""),
        Line::from(Span::styled(
            "[ Sign In ]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("Or continue with  Google · Apple", theme.muted()))
            .alignment(Alignment::Center),
    ];

    let body = Paragraph::new(lines).block(card("", app));
    f.render_widget(body, centered(area, 44, 14));
}

pub fn render_onboarding(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Track Health & Habits", theme.title())),
        Line::from(""),
        Line::from(Span::styled(
            "Monitor your pet's daily activities, health records, and get \
             AI-powered veterinary advice instantly.",
            Style::default().fg(theme.foreground),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[ Get Started ]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(card("", app));
    f.render_widget(body, centered(area, 50, 11));
}
