use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::components::{Component, NotificationModal, WizardComponent};
use super::utils::centered_rect;
use crate::app::{App, Effect};

const MAX_FORM_WIDTH: u16 = 72;
const MODAL_WIDTH: u16 = 48;
const MODAL_HEIGHT: u16 = 7;

/// Root view: the wizard, a hint bar, and the notification modal on top
/// whenever one is open.
#[derive(Debug, Default)]
pub struct MainView {
    wizard: WizardComponent,
    notification: NotificationModal,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a key to the modal while it is open, otherwise to the form.
    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.notifications.is_open() {
            self.notification.handle_key_events(app, key)
        } else {
            self.wizard.handle_key_events(app, key)
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [content_area, hints_area] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let form_area = Rect {
            width: content_area.width.min(MAX_FORM_WIDTH),
            ..content_area
        };
        self.wizard.render(frame, form_area, app);

        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.theme.text_muted_style())];
        if app.notifications.is_open() {
            hint_spans.extend(self.notification.hint_spans(app));
        } else {
            hint_spans.extend(self.wizard.hint_spans(app));
        }
        frame.render_widget(Paragraph::new(Line::from(hint_spans)), hints_area);

        if app.notifications.is_open() {
            frame.render_widget(Block::default().style(app.theme.modal_background_style()).dim(), content_area);
            let modal_area = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, form_area);
            self.notification.render(frame, modal_area, app);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Msg;
    use crate::app::tests::{fill_step_one, test_app};
    use crossterm::event::{KeyCode, KeyModifiers};
    use enroll_engine::NotificationSink;
    use enroll_types::Step;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn screen_text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn draw(view: &mut MainView, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).expect("terminal");
        terminal.draw(|frame| view.render(frame, frame.area(), app)).expect("draw");
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn first_step_renders_credentials_form() {
        let mut app = test_app();
        let mut view = MainView::new();
        let screen = draw(&mut view, &mut app);
        assert!(screen.contains("1. Step One"));
        assert!(screen.contains("First Name"));
        assert!(screen.contains("Confirm Password"));
        assert!(screen.contains("Next"));
        assert!(!screen.contains("Company"));
    }

    #[test]
    fn passwords_are_masked_and_errors_inline() {
        let mut app = test_app();
        let mut view = MainView::new();
        fill_step_one(&mut app);
        let screen = draw(&mut view, &mut app);
        assert!(screen.contains("•••••"));
        assert!(!screen.contains("abcde"));

        let mut blank = test_app();
        while blank.focused() != crate::app::FocusTarget::Next {
            blank.update(Msg::FocusNext);
        }
        blank.update(Msg::Activate);
        let screen = draw(&mut view, &mut blank);
        assert!(screen.contains("Email is required!"));
    }

    #[test]
    fn keys_reach_the_form_until_a_modal_opens() {
        let mut app = test_app();
        let mut view = MainView::new();
        view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT));
        assert_eq!(app.inputs[&enroll_types::FieldName::FirstName].input(), "Z");

        app.notifications.show_error("Oops!", "Email taken");
        let screen = draw(&mut view, &mut app);
        assert!(screen.contains("Oops!"));
        assert!(screen.contains("Email taken"));

        view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(app.inputs[&enroll_types::FieldName::FirstName].input(), "Z");
        view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.notifications.is_open());
        assert_eq!(app.controller.current_step(), Step::First);
    }

    #[test]
    fn wait_modal_shows_throbber() {
        let mut app = test_app();
        let mut view = MainView::new();
        app.notifications.show_blocking_wait();
        let screen = draw(&mut view, &mut app);
        assert!(screen.contains("Please wait..."));
        view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.notifications.is_blocking());
    }
}
