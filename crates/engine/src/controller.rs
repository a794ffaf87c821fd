//! Step transitions for the registration wizard.

use enroll_types::{ErrorMap, FieldSet, Step};
use tracing::debug;

use crate::store::FormDataStore;
use crate::validation::ValidationEngine;

/// Mutable state of one wizard instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: Step,
    /// Values confirmed by leaving a step, forwards or backwards.
    pub captured_values: FieldSet,
    /// True only while a submission request is outstanding.
    pub is_submitting: bool,
}

/// Result of a successful [`StepController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to the given step.
    Advanced(Step),
    /// The last step validated; submit these merged values.
    Submit(FieldSet),
}

/// Owns [`WizardState`] and gates forward motion on validation.
#[derive(Debug, Clone)]
pub struct StepController {
    state: WizardState,
    user_type: String,
}

impl StepController {
    /// New controller at the first step. `user_type` is the constant value of
    /// the hidden `userType` field.
    pub fn new(user_type: impl Into<String>) -> Self {
        Self {
            state: WizardState::default(),
            user_type: user_type.into(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn captured_values(&self) -> &FieldSet {
        &self.state.captured_values
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting
    }

    pub fn user_type(&self) -> &str {
        &self.user_type
    }

    /// Validate `live` at the current step and move forward.
    ///
    /// On the last step no transition happens; the merged values are handed
    /// back for submission instead.
    pub fn advance(&mut self, live: &FieldSet) -> Result<Transition, ErrorMap> {
        let step = self.state.current_step;
        let errors = ValidationEngine::validate(live, step);
        if !errors.is_empty() {
            debug!(%step, invalid = errors.len(), "advance blocked by validation");
            return Err(errors);
        }

        let merged = FormDataStore::merge(&self.state.captured_values, live);
        match step {
            Step::First => {
                self.state.captured_values = merged;
                self.state.current_step = Step::Second;
                debug!("advanced to second step");
                Ok(Transition::Advanced(Step::Second))
            }
            Step::Second => Ok(Transition::Submit(merged)),
        }
    }

    /// Keep `live` and return to the first step. Never blocked.
    pub fn back(&mut self, live: &FieldSet) -> Step {
        self.state.captured_values = FormDataStore::merge(&self.state.captured_values, live);
        self.state.current_step = Step::First;
        Step::First
    }

    /// Defaults the input surface should be rebound to right now.
    pub fn defaults(&self) -> FieldSet {
        FormDataStore::defaults(self.state.current_step, &self.state.captured_values, &self.user_type)
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.state.is_submitting = submitting;
    }

    /// Return to the initial state: first step, nothing captured.
    pub fn reset(&mut self) {
        self.state = WizardState::default();
    }
}
