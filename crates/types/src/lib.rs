//! Shared type definitions for the Enroll registration wizard.
//!
//! Every crate in the workspace speaks in terms of these types: the wizard
//! [`Step`], the [`FieldSet`] of live or captured values, the [`ErrorMap`]
//! produced by validation, and the wire shapes exchanged with the
//! registration service.

mod field;
mod payload;
mod step;

pub use field::{ErrorMap, FieldName, FieldSet, STEP_TRACKER_KEY};
pub use payload::{RegistrationResponse, SubmissionPayload};
pub use step::Step;

/// Feedback presented by the notification sink.
///
/// Exactly one notification is visible at a time; `Wait` blocks all user
/// input until it is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Blocking "please wait" indicator shown while a submission is outstanding.
    Wait,
    /// The registration service accepted the submission.
    Success { message: String },
    /// A submission failed; `title` is a short heading, `message` the detail.
    Error { title: String, message: String },
}

impl Notification {
    /// Whether this notification blocks user input until it is closed.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Notification::Wait)
    }
}
