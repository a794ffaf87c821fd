use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use enroll_types::{FieldName, Step};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Effect, FocusTarget, Msg};
use crate::ui::components::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers as th;

const BUTTON_WIDTH: u16 = 12;

/// The two-step form: step indicator, the active step's inputs with inline
/// errors, and the Back / Next|Confirm buttons.
#[derive(Debug, Default)]
pub struct WizardComponent;

impl WizardComponent {
    fn render_step_indicator(frame: &mut Frame, area: Rect, theme: &dyn Theme, current: Step) {
        let mut spans = Vec::new();
        for (index, step) in Step::all().into_iter().enumerate() {
            if index > 0 {
                spans.push(Span::styled("  ──  ", theme.text_muted_style()));
            }
            let (marker, style) = if step == current {
                ("●", theme.accent_emphasis_style())
            } else {
                ("○", theme.text_muted_style())
            };
            spans.push(Span::styled(format!("{marker} {}. {}", step.number(), step.title()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_field(frame: &mut Frame, area: Rect, app: &App, field: FieldName, focused: bool) {
        let Some(input) = app.inputs.get(&field) else {
            return;
        };
        let theme = &*app.theme;
        let error = app.errors.get(field);

        let mut block = th::block(theme, Some(field.label()), focused);
        if let Some(message) = error {
            block = block.title_bottom(Span::styled(format!(" {message} "), theme.status_error()));
            if !focused {
                block = block.border_style(theme.status_error());
            }
        }
        let inner = block.inner(area);
        let secret = field.is_secret();
        let paragraph = Paragraph::new(input.display_text(secret))
            .style(th::input_style(theme, error.is_none(), focused))
            .block(block);
        frame.render_widget(paragraph, area);

        if focused && inner.width > 0 {
            let column = input.cursor_column(secret).min(inner.width - 1);
            frame.set_cursor_position(Position::new(inner.x + column, inner.y));
        }
    }
}

impl Component for WizardComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let msg = match key.code {
            KeyCode::Tab | KeyCode::Down => Msg::FocusNext,
            KeyCode::BackTab | KeyCode::Up => Msg::FocusPrev,
            KeyCode::Enter => Msg::Activate,
            KeyCode::Left => Msg::CursorLeft,
            KeyCode::Right => Msg::CursorRight,
            KeyCode::Backspace => Msg::InputBackspace,
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Msg::InputChar(c),
            _ => return Vec::new(),
        };
        app.update(msg)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let app: &App = app;
        let theme = &*app.theme;
        let outer = th::block(theme, Some(" Create Account "), false);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let step = app.controller.current_step();
        let [indicator_area, fields_area, buttons_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0), Constraint::Length(3)]).areas(inner);
        Self::render_step_indicator(frame, indicator_area, theme, step);

        let fields = step.visible_fields();
        let field_areas = Layout::vertical(fields.iter().map(|_| Constraint::Length(3))).split(fields_area);
        let focused = app.focused();
        for (field, area) in fields.iter().zip(field_areas.iter()) {
            Self::render_field(frame, *area, app, *field, focused == FocusTarget::Field(*field));
        }

        let [back_area, _, next_area, _] = Layout::horizontal([
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Length(2),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
        ])
        .areas(buttons_area);
        th::render_button(frame, back_area, "Back", app.back_enabled(), focused == FocusTarget::Back, theme);
        th::render_button(
            frame,
            next_area,
            app.next_label(),
            app.next_enabled(),
            focused == FocusTarget::Next,
            theme,
        );
    }

    fn hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.theme,
            &[("Tab/Shift+Tab", " focus  "), ("Enter", " next/confirm  "), ("Ctrl+C", " quit")],
        )
    }
}
