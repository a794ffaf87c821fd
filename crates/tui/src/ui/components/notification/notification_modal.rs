use crossterm::event::{KeyCode, KeyEvent};
use enroll_types::Notification;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{App, Effect, Msg, THROBBER_FRAMES};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers as th;

/// Heading of the notification shown after a successful registration.
pub const SUCCESS_TITLE: &str = "Account Created";

/// Modal presenting the current [`Notification`].
///
/// The wait notification ignores every key; success and error close with
/// Enter or Esc.
#[derive(Debug, Default)]
pub struct NotificationModal;

impl Component for NotificationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.update(Msg::DismissNotification),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(notification) = app.notifications.current() else {
            return;
        };
        let theme = &*app.theme;

        let (title, border_style, body) = match notification {
            Notification::Wait => {
                let frame_symbol = THROBBER_FRAMES[app.throbber_idx % THROBBER_FRAMES.len()];
                let line = Line::from(vec![
                    Span::styled(frame_symbol, theme.accent_emphasis_style()),
                    Span::styled(" Please wait...", theme.text_primary_style()),
                ]);
                ("Submitting", theme.border_style(true), line)
            }
            Notification::Success { message } => (
                SUCCESS_TITLE,
                theme.status_success(),
                Line::styled(message.as_str(), theme.text_primary_style()),
            ),
            Notification::Error { title, message } => (
                title.as_str(),
                theme.status_error(),
                Line::styled(message.as_str(), theme.text_primary_style()),
            ),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(format!(" {title} "), border_style))
            .style(th::panel_style(theme));
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
    }

    fn hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        if app.notifications.is_blocking() {
            return Vec::new();
        }
        th::build_hint_spans(&*app.theme, &[("Enter/Esc", " close")])
    }
}
