// Settings and user profile screens
//
// Settings also carries the recent-log pane: in TUI mode logs are captured
// in memory instead of printed, and this is where they surface.

use super::card;
use crate::config::VERSION;
use crate::logging::LogEntry;
use crate::tui::app::App;
use crate::util::preview;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

const MENU: [&str; 4] = [
    "Notifications",
    "Privacy & Security",
    "Connected Accounts",
    "Help & Support",
];

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let [profile, menu, logs] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(MENU.len() as u16 + 5),
        Constraint::Min(4),
    ])
    .areas(area);

    let profile_card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(app.config.user_name.as_str(), theme.title()),
            Span::styled("   p › edit profile", theme.muted()),
        ]),
        Line::from(Span::styled("Premium Member", theme.muted())),
    ])
    .block(card("", app));
    f.render_widget(profile_card, profile);

    let advisor_status = if app.advisor_ready() {
        Span::styled(
            format!("{} ({})", app.advisor_name(), app.config.advice.model),
            Style::default().fg(theme.success),
        )
    } else {
        Span::styled(format!("{} (no API key)", app.advisor_name()), Style::default().fg(theme.danger))
    };

    let mut items: Vec<ListItem> = MENU
        .iter()
        .map(|label| {
            ListItem::new(Line::from(vec![
                Span::styled(*label, Style::default().fg(theme.foreground)),
                Span::styled("  ›", theme.muted()),
            ]))
        })
        .collect();
    items.push(ListItem::new(Line::from(vec![
        Span::styled("Theme: ", Style::default().fg(theme.foreground)),
        Span::styled(app.theme_kind.name(), theme.title()),
        Span::styled("  t to switch", theme.muted()),
    ])));
    items.push(ListItem::new(Line::from(vec![
        Span::styled("AI backend: ", Style::default().fg(theme.foreground)),
        advisor_status,
    ])));
    items.push(ListItem::new(Line::from(Span::styled(
        "Log Out  (x)",
        Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
    ))));
    f.render_widget(
        List::new(items).block(card(format!(" Settings · v{VERSION} "), app)),
        menu,
    );

    render_logs(f, logs, app);
}

fn render_logs(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .log_buffer
        .recent(height)
        .iter()
        .map(|entry| ListItem::new(format_log_entry(entry, width)).style(theme.log_level(entry.level)))
        .collect();

    let title = format!(" Recent Logs ({}) ", app.log_buffer.len());
    f.render_widget(List::new(items).block(card(title, app)), area);
}

fn format_log_entry(entry: &LogEntry, width: usize) -> String {
    let line = format!(
        "{} {:5} [{}] {}",
        entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
        entry.level.as_str(),
        entry.target.rsplit("::").next().unwrap_or_default(),
        entry.message
    );
    preview(&line, width)
}

pub fn render_user_profile(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let name = app.config.user_name.as_str();
    let initial = name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));

    let field = |label: &'static str, value: String| {
        vec![
            Line::from(Span::styled(label, theme.muted().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(format!("  {value}"), Style::default().fg(theme.foreground))),
            Line::from(""),
        ]
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {initial} "), theme.selected()),
            Span::raw("  "),
            Span::styled(name, theme.title()),
        ]),
        Line::from(Span::styled(email.clone(), theme.muted())),
        Line::from(""),
    ];
    lines.extend(field("FULL NAME", name.to_string()));
    lines.extend(field("EMAIL ADDRESS", email));
    lines.extend(field("PHONE NUMBER", "+1 (555) 123-4567".to_string()));

    f.render_widget(Paragraph::new(lines).block(card("", app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use chrono::Utc;

    #[test]
    fn test_log_line_fits_width() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            target: "petpal::advice".to_string(),
            message: "Gemini request failed: connection refused".to_string(),
        };
        let line = format_log_entry(&entry, 30);
        assert_eq!(line.chars().count(), 30);
        assert!(line.contains("WARN"));
        assert!(line.ends_with('…'));
    }
}
