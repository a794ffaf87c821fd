//! Application state for the registration wizard.
//!
//! [`App`] owns the [`StepController`], the text inputs bound to the
//! controller's derived defaults, inline validation errors, focus and the
//! notification currently on screen. All changes go through
//! [`App::update`], which returns [`Effect`]s for the runtime to execute.

use std::sync::Arc;

use enroll_api::{ApiError, RegistrationService};
use enroll_engine::{NotificationSink, StepController, SubmissionCoordinator, SubmissionOutcome, Transition};
use enroll_types::{ErrorMap, FieldName, FieldSet, Notification, RegistrationResponse, SubmissionPayload};
use indexmap::IndexMap;
use tracing::debug;

use crate::ui::components::common::TextInputState;
use crate::ui::theme::{self, Theme};

/// Frames of the spinner drawn while a submission is outstanding.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Something that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(FieldName),
    Back,
    Next,
}

/// The notification currently on screen, if any.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationState {
    current: Option<Notification>,
}

impl NotificationState {
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_blocking(&self) -> bool {
        self.current.as_ref().is_some_and(Notification::is_blocking)
    }
}

impl NotificationSink for NotificationState {
    fn show_blocking_wait(&mut self) {
        self.current = Some(Notification::Wait);
    }

    fn show_success(&mut self, message: &str) {
        self.current = Some(Notification::Success {
            message: message.to_string(),
        });
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.current = Some(Notification::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn close(&mut self) {
        self.current = None;
    }
}

/// Messages that update the application state.
#[derive(Debug)]
pub enum Msg {
    /// Periodic UI tick (animates the throbber)
    Tick,
    FocusNext,
    FocusPrev,
    /// Insert a character into the focused input
    InputChar(char),
    /// Delete the character before the cursor in the focused input
    InputBackspace,
    CursorLeft,
    CursorRight,
    /// Enter on the focused element: advance/submit, or go back on Back
    Activate,
    /// Close a non-blocking notification
    DismissNotification,
    /// The registration request finished
    SubmissionCompleted(Result<RegistrationResponse, ApiError>),
}

impl Msg {
    fn is_user_input(&self) -> bool {
        matches!(
            self,
            Msg::FocusNext
                | Msg::FocusPrev
                | Msg::InputChar(_)
                | Msg::InputBackspace
                | Msg::CursorLeft
                | Msg::CursorRight
                | Msg::Activate
        )
    }
}

/// Side effects the runtime performs on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the payload to the registration service off the UI loop.
    SubmitRegistration(SubmissionPayload),
}

pub struct App {
    pub controller: StepController,
    pub coordinator: SubmissionCoordinator,
    pub notifications: NotificationState,
    /// One input per editable field, rebound whenever the wizard state changes.
    pub inputs: IndexMap<FieldName, TextInputState>,
    pub errors: ErrorMap,
    pub throbber_idx: usize,
    pub theme: Box<dyn Theme>,
    /// Defaults the inputs were last bound to; supplies the hidden keys.
    bound: FieldSet,
    focus_index: usize,
}

impl App {
    pub fn new(user_type: &str, service: Arc<dyn RegistrationService>) -> Self {
        let mut app = Self {
            controller: StepController::new(user_type),
            coordinator: SubmissionCoordinator::new(service),
            notifications: NotificationState::default(),
            inputs: IndexMap::new(),
            errors: ErrorMap::new(),
            throbber_idx: 0,
            theme: theme::load(),
            bound: FieldSet::new(),
            focus_index: 0,
        };
        app.rebind();
        app
    }

    /// Replace every input with the controller's current defaults.
    ///
    /// Unsaved edits are discarded and focus returns to the first field.
    fn rebind(&mut self) {
        let defaults = self.controller.defaults();
        self.inputs = FieldName::EDITABLE
            .iter()
            .map(|field| (*field, TextInputState::with_text(defaults.value(*field))))
            .collect();
        self.bound = defaults;
        self.focus_index = 0;
    }

    /// Values currently on the input surface, hidden keys included.
    pub fn live_values(&self) -> FieldSet {
        let mut live = self.bound.clone();
        live.extend(self.inputs.iter().map(|(field, input)| (field.as_str(), input.input())));
        live
    }

    pub fn back_enabled(&self) -> bool {
        self.controller.current_step().is_last() && !self.controller.is_submitting()
    }

    pub fn next_enabled(&self) -> bool {
        !self.controller.is_submitting()
    }

    pub fn next_label(&self) -> &'static str {
        if self.controller.current_step().is_last() { "Confirm" } else { "Next" }
    }

    /// Focusable elements of the active step, in tab order.
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets: Vec<FocusTarget> = self
            .controller
            .current_step()
            .visible_fields()
            .iter()
            .copied()
            .map(FocusTarget::Field)
            .collect();
        if self.back_enabled() {
            targets.push(FocusTarget::Back);
        }
        targets.push(FocusTarget::Next);
        targets
    }

    pub fn focused(&self) -> FocusTarget {
        self.focus_targets()
            .get(self.focus_index)
            .copied()
            .unwrap_or(FocusTarget::Next)
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        if self.notifications.is_blocking() && msg.is_user_input() {
            return Vec::new();
        }
        match msg {
            Msg::Tick => {
                if self.notifications.is_blocking() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
            }
            Msg::FocusNext => self.move_focus(1),
            Msg::FocusPrev => self.move_focus(-1),
            Msg::InputChar(c) => self.edit_focused(|input| input.insert_char(c)),
            Msg::InputBackspace => self.edit_focused(TextInputState::backspace),
            Msg::CursorLeft => {
                if let Some(input) = self.focused_input_mut() {
                    input.move_left();
                }
            }
            Msg::CursorRight => {
                if let Some(input) = self.focused_input_mut() {
                    input.move_right();
                }
            }
            Msg::Activate => {
                if self.focused() == FocusTarget::Back {
                    self.back();
                } else {
                    return self.advance();
                }
            }
            Msg::DismissNotification => {
                if !self.notifications.is_blocking() {
                    self.notifications.close();
                }
            }
            Msg::SubmissionCompleted(result) => self.complete_submission(result),
        }
        Vec::new()
    }

    fn move_focus(&mut self, delta: isize) {
        let count = self.focus_targets().len() as isize;
        self.focus_index = (self.focus_index as isize + delta).rem_euclid(count) as usize;
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        let FocusTarget::Field(field) = self.focused() else {
            return None;
        };
        self.inputs.get_mut(&field)
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut TextInputState)) {
        let FocusTarget::Field(field) = self.focused() else {
            return;
        };
        if let Some(input) = self.inputs.get_mut(&field) {
            edit(input);
            self.errors.clear_field(field);
        }
    }

    fn advance(&mut self) -> Vec<Effect> {
        if self.controller.is_submitting() {
            return Vec::new();
        }
        let live = self.live_values();
        match self.controller.advance(&live) {
            Err(errors) => {
                let first_invalid = self
                    .focus_targets()
                    .iter()
                    .position(|target| matches!(target, FocusTarget::Field(field) if errors.contains(*field)));
                self.errors = errors;
                if let Some(index) = first_invalid {
                    self.focus_index = index;
                }
                Vec::new()
            }
            Ok(Transition::Advanced(step)) => {
                debug!(%step, "wizard advanced");
                self.errors = ErrorMap::new();
                self.rebind();
                Vec::new()
            }
            Ok(Transition::Submit(merged)) => {
                self.errors = ErrorMap::new();
                self.throbber_idx = 0;
                self.coordinator
                    .begin(&mut self.controller, &mut self.notifications, &merged)
                    .map(Effect::SubmitRegistration)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn back(&mut self) {
        if !self.back_enabled() {
            return;
        }
        let live = self.live_values();
        self.controller.back(&live);
        self.errors = ErrorMap::new();
        self.rebind();
    }

    fn complete_submission(&mut self, result: Result<RegistrationResponse, ApiError>) {
        let outcome = self
            .coordinator
            .finish(&mut self.controller, &mut self.notifications, result);
        if matches!(outcome, SubmissionOutcome::Succeeded { .. }) {
            self.rebind();
        }
    }
}
