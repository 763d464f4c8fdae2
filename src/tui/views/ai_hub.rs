// AI hub - chat transcript and input line
//
// The transcript is bottom-anchored: the newest message is always visible
// and older lines scroll off the top.

use super::card;
use crate::chat::{ChatSession, Role};
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let [transcript, input] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

    let title = Line::from(Span::styled(format!(" {} ", app.chat_title()), app.theme.title()));
    let block = card(title, app);
    let inner = block.inner(transcript);
    f.render_widget(block, transcript);

    // Session is created on the navigation update that follows the key press
    let lines = match app.chat_session() {
        Some(session) => transcript_lines(session, app, inner.width),
        None => vec![Line::from(Span::styled(
            ChatSession::greeting(app.nav.active_pet()),
            app.theme.muted(),
        ))],
    };
    let skip = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    f.render_widget(Paragraph::new(visible), inner);

    render_input(f, input, app);
}

fn transcript_lines<'a>(session: &'a ChatSession, app: &App, width: u16) -> Vec<Line<'a>> {
    let theme = &app.theme;
    // Bubbles take 80% of the width, like a phone chat
    let bubble_width = (width as usize * 4 / 5).max(10);
    let mut lines = Vec::new();

    for message in session.messages() {
        let (label, alignment, style) = match message.role {
            Role::User => (
                "You",
                Alignment::Right,
                Style::default().fg(theme.accent),
            ),
            Role::Assistant => (
                "PetPal",
                Alignment::Left,
                Style::default().fg(theme.foreground),
            ),
        };

        lines.push(
            Line::from(Span::styled(
                format!("{label} · {}", message.created_at.with_timezone(&chrono::Local).format("%H:%M")),
                theme.muted().add_modifier(Modifier::ITALIC),
            ))
            .alignment(alignment),
        );
        for row in wrap_words(&message.text, bubble_width) {
            lines.push(Line::from(Span::styled(row, style)).alignment(alignment));
        }
        lines.push(Line::from(""));
    }

    if session.is_pending() {
        lines.push(Line::from(Span::styled(
            format!("PetPal is typing {}", app.spinner()),
            theme.muted(),
        )));
    }
    lines
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let pending = app.chat_session().is_some_and(|s| s.is_pending());

    let content = if app.input.is_empty() {
        Line::from(Span::styled(app.input_placeholder(), theme.muted()))
    } else {
        Line::from(vec![
            Span::styled(app.input.as_str(), Style::default().fg(theme.foreground)),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ])
    };

    let send_style = if pending || app.input.trim().is_empty() {
        theme.muted()
    } else {
        theme.title()
    };
    let block = card(Line::from(Span::styled(" Send ⏎ ", send_style)).alignment(Alignment::Right), app);

    // Keep the end of a long input visible
    let inner_width = area.width.saturating_sub(3) as usize;
    let overflow = app.input.chars().count().saturating_sub(inner_width);
    f.render_widget(
        Paragraph::new(content).scroll((0, overflow as u16)).block(block),
        area,
    );
}

/// Greedy word wrap on char counts; words longer than `width` are split
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if row_len > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_len = 0;
                }
                let rest = word.split_off(width);
                rows.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if row_len == 0 { word.len() } else { row_len + 1 + word.len() };
            if needed > width {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }
            row.extend(word.iter());
            row_len += word.len();
        }
        rows.push(row);
    }
    rows
}
