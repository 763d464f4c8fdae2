//! Toast notification
//!
//! One-line notice floating just above the status footer. The kind decides
//! the colour, the leading icon and how long it stays up: refusals linger a
//! little longer than confirmations.

use super::theme::Theme;
use crate::chat::Rejection;
use crate::nav::NavigationError;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral state change (theme switched)
    Info,
    /// Something the user asked for went through
    Success,
    /// An action was refused; nothing changed
    Refused,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ",
            ToastKind::Success => "✓",
            ToastKind::Refused => "!",
        }
    }

    fn color(self, theme: &Theme) -> Color {
        match self {
            ToastKind::Info => theme.accent,
            ToastKind::Success => theme.success,
            ToastKind::Refused => theme.danger,
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            ToastKind::Refused => Duration::from_millis(3500),
            _ => Duration::from_secs(2),
        }
    }
}

pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.kind.lifetime()
    }

    /// Centered on the bottom edge of `area`, clear of the footer line
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let color = self.kind.color(theme);
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", self.kind.icon()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.message.as_str(), Style::default().fg(theme.foreground)),
        ]);

        let width = (line.width() as u16 + 4).min(area.width);
        let height = 3.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.bottom().saturating_sub(height + 1);
        let toast_area = Rect::new(x, y, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.background));

        f.render_widget(Clear, toast_area);
        f.render_widget(
            Paragraph::new(line).alignment(Alignment::Center).block(block),
            toast_area,
        );
    }
}

impl From<&NavigationError> for Toast {
    fn from(e: &NavigationError) -> Self {
        Toast::new(ToastKind::Refused, e.to_string())
    }
}

impl From<Rejection> for Toast {
    fn from(rejection: Rejection) -> Self {
        Toast::new(ToastKind::Refused, format!("Hold on, {rejection}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::ThemeKind;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_refusals_outlive_confirmations() {
        assert!(ToastKind::Refused.lifetime() > ToastKind::Success.lifetime());
        assert!(!Toast::new(ToastKind::Info, "Theme: Light").is_expired());
    }

    #[test]
    fn test_pending_rejection_becomes_refused_toast() {
        let toast = Toast::from(Rejection::Pending);
        assert_eq!(toast.kind, ToastKind::Refused);
        assert!(toast.message.starts_with("Hold on, "));
    }

    #[test]
    fn test_renders_icon_and_message_above_footer() {
        let theme = ThemeKind::default().theme();
        let toast = Toast::new(ToastKind::Success, "Task done");
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| toast.render(f, f.area(), &theme))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..40).map(|x| buffer[(x, 7)].symbol()).collect();
        assert!(row.contains("✓ Task done"), "{row}");
        // Footer line stays untouched
        let footer: String = (0..40).map(|x| buffer[(x, 9)].symbol()).collect();
        assert_eq!(footer.trim(), "");
    }
}
