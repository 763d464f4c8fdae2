// Pet profile - header, vitals and management shortcuts

use super::{card, short_date};
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    // Reached without a pet only through an unguarded `goto`
    let Some(pet) = app.nav.active_pet() else {
        let empty = Paragraph::new("No pet selected. Press Esc to return home.")
            .style(theme.muted())
            .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    };

    let [header, vitals, body] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Min(6),
    ])
    .areas(area);

    let title = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("← ", theme.muted()),
            Span::styled(
                pet.name.as_str(),
                theme.title().add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(Span::styled(
            format!("{} • {} yrs • {}", pet.breed, pet.age, pet.kind),
            Style::default().fg(theme.foreground),
        )),
    ])
    .block(card("", app));
    f.render_widget(title, header);

    let stat = |label: &'static str, value: String, style: Style| {
        Paragraph::new(vec![
            Line::from(Span::styled(label, theme.muted())),
            Line::from(Span::styled(value, style.add_modifier(Modifier::BOLD))),
        ])
        .alignment(Alignment::Center)
        .block(card("", app))
    };
    let value_style = Style::default().fg(theme.foreground);
    let [weight, vet, status] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(vitals);
    f.render_widget(stat("WEIGHT", format!("{} kg", pet.weight_kg), value_style), weight);
    f.render_widget(stat("NEXT VET", short_date(&pet.next_vet_visit), value_style), vet);
    f.render_widget(
        stat("STATUS", "Healthy".to_string(), Style::default().fg(theme.success)),
        status,
    );

    let [manage, tasks] = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .areas(body);

    let tiles = [
        ("r", "Health Records".to_string()),
        ("t", "Training".to_string()),
        ("c", "Calendar".to_string()),
        ("a", format!("Ask AI about {}", pet.name)),
    ];
    let items: Vec<ListItem> = tiles
        .iter()
        .map(|(key, label)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {key} "), theme.selected()),
                Span::raw("  "),
                Span::styled(label.as_str(), Style::default().fg(theme.foreground)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(card(" Management ", app)), manage);

    let task_items: Vec<ListItem> = app
        .data
        .tasks_for(&pet.id)
        .map(|task| {
            let check = if task.completed { "✓" } else { "·" };
            ListItem::new(format!("{check} {} {}  {}", task.kind.icon(), task.title, task.time))
        })
        .collect();
    f.render_widget(
        List::new(task_items)
            .style(Style::default().fg(theme.foreground))
            .block(card(" Care Today ", app)),
        tasks,
    );
}
