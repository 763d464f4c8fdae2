// Dashboard - greeting, pet cards and today's tasks

use super::card;
use crate::data::PetKind;
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

const PET_CARD_WIDTH: u16 = 24;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let [header, pets, tasks] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Min(4),
    ])
    .areas(area);

    render_greeting(f, header, app);
    render_pets(f, pets, app);
    render_tasks(f, tasks, app);
}

fn render_greeting(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(Span::styled("Good Morning,", app.theme.muted())),
        Line::from(Span::styled(app.config.user_name.as_str(), app.theme.title())),
    ];
    f.render_widget(Paragraph::new(lines), area.inner(ratatui::layout::Margin::new(1, 0)));
}

fn render_pets(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let pets = app.data.pets();

    // One slot per pet plus the "add" placeholder
    let mut constraints: Vec<Constraint> = pets
        .iter()
        .map(|_| Constraint::Length(PET_CARD_WIDTH))
        .collect();
    constraints.push(Constraint::Length(PET_CARD_WIDTH));
    constraints.push(Constraint::Min(0));
    let slots = Layout::horizontal(constraints).spacing(1).split(area);

    for (i, pet) in pets.iter().enumerate() {
        let icon = match pet.kind {
            PetKind::Dog => "🐕",
            PetKind::Cat => "🐈",
            PetKind::Other => "🐾",
        };
        let selected = i == app.selected_pet;
        let name_style = if selected {
            theme.selected()
        } else {
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD)
        };

        let body = Paragraph::new(vec![
            Line::from(vec![
                Span::raw(format!("{icon} ")),
                Span::styled(pet.name.as_str(), name_style),
            ]),
            Line::from(Span::styled(pet.breed.as_str(), theme.muted())),
            Line::from(Span::styled(format!("{} yrs", pet.age), theme.muted())),
        ]);
        let block = if selected {
            card("", app).border_style(Style::default().fg(theme.accent))
        } else {
            card("", app)
        };
        f.render_widget(body.block(block), slots[i]);
    }

    let add = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("  + Add Pet", theme.muted())),
    ])
    .block(card("", app));
    f.render_widget(add, slots[pets.len()]);
}

fn render_tasks(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let tasks = app.data.tasks();
    let done = tasks.len() - app.data.pending_task_count();

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let check = if task.completed { "[✓]" } else { "[ ]" };
            let title_style = if task.completed {
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.foreground)
            };
            let pet_name = app
                .data
                .pet(&task.pet_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");

            let line = Line::from(vec![
                Span::styled(format!("{check} "), Style::default().fg(theme.accent)),
                Span::raw(format!("{} ", task.kind.icon())),
                Span::styled(task.title.as_str(), title_style),
                Span::styled(format!("  {} · {}", task.time, pet_name), theme.muted()),
            ]);

            let item = ListItem::new(line);
            if i == app.selected_task {
                item.style(Style::default().bg(theme.selection))
            } else {
                item
            }
        })
        .collect();

    let title = Line::from(vec![
        Span::styled(" Today's Tasks ", theme.title()),
        Span::styled(format!("{done}/{} Done ", tasks.len()), theme.muted()),
    ]);
    f.render_widget(List::new(items).block(card(title, app)), area);
}
