// Health records, training progress and calendar screens

use super::{card, short_date};
use crate::data::EventKind;
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, List, ListItem, Paragraph, Row, Table},
    Frame,
};

pub fn render_health(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let header = Row::new(["DATE", "TYPE", "NOTE", "VET"])
        .style(theme.muted().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows = app.data.health_records().iter().map(|record| {
        Row::new([
            record.date.clone(),
            record.kind.clone(),
            record.notes.clone(),
            record.vet.clone(),
        ])
        .style(Style::default().fg(theme.foreground))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Min(20),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(card(
        Line::from(vec![
            Span::styled(" Recent Records ", theme.title()),
            Span::styled("(+ Add coming soon) ", theme.muted()),
        ]),
        app,
    ));
    f.render_widget(table, area);
}

pub fn render_training(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let sessions = app.data.training_sessions();

    let [success, duration, summary] = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Percentage(35),
        Constraint::Min(3),
    ])
    .areas(area);

    let rates: Vec<(&str, u64)> = sessions
        .iter()
        .map(|s| (s.day.as_str(), u64::from(s.success_rate)))
        .collect();
    let chart = BarChart::default()
        .block(card(" Success Rate % (Last 7 Days) ", app))
        .data(rates.as_slice())
        .max(100)
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(theme.selected());
    f.render_widget(chart, success);

    let minutes: Vec<(&str, u64)> = sessions
        .iter()
        .map(|s| (s.day.as_str(), u64::from(s.duration_min)))
        .collect();
    let chart = BarChart::default()
        .block(card(" Weekly Duration (Minutes) ", app))
        .data(minutes.as_slice())
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.success))
        .value_style(theme.selected());
    f.render_widget(chart, duration);

    // Average per command, in first-seen order
    let mut commands: Vec<&str> = Vec::new();
    for s in sessions {
        if !commands.contains(&s.command.as_str()) {
            commands.push(s.command.as_str());
        }
    }
    let spans: Vec<Span> = commands
        .iter()
        .filter_map(|command| {
            let rate = app.data.success_rate_for(command)?;
            Some(Span::styled(
                format!("{command}: {rate:.0}%   "),
                Style::default().fg(theme.foreground),
            ))
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(card(" Average by Command ", app)),
        summary,
    );
}

pub fn render_calendar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let [schedule, vet] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(4)]).areas(area);

    let items: Vec<ListItem> = app
        .data
        .calendar_events()
        .iter()
        .map(|event| {
            let color = match event.kind {
                EventKind::Medical => theme.danger,
                EventKind::Grooming => theme.accent,
                EventKind::Training => theme.success,
            };
            let pet = app
                .data
                .pet(&event.pet_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", event.kind.icon()), Style::default().fg(color)),
                    Span::styled(
                        event.title.as_str(),
                        Style::default()
                            .fg(theme.foreground)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(format!("   {} · {pet}", event.when), theme.muted())),
                Line::from(""),
            ])
        })
        .collect();
    f.render_widget(List::new(items).block(card(" Schedule ", app)), schedule);

    let visits: Vec<Span> = app
        .data
        .pets()
        .iter()
        .map(|pet| {
            Span::styled(
                format!("{}: {}   ", pet.name, short_date(&pet.next_vet_visit)),
                Style::default().fg(theme.foreground),
            )
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(visits)).block(card(" Next Vet Visits ", app)),
        vet,
    );
}
