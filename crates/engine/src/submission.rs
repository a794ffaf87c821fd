//! The async submit lifecycle.
//!
//! A submission is split in two halves around the single suspension point,
//! the HTTP request:
//!
//! 1. [`SubmissionCoordinator::begin`] builds the payload, raises the
//!    submitting flag and opens the blocking wait notification.
//! 2. [`SubmissionCoordinator::finish`] closes the wait notification,
//!    reports the outcome and clears the flag.
//!
//! Event loops that cannot await in place run the request themselves between
//! the two calls; everyone else uses [`SubmissionCoordinator::submit`].

use std::sync::Arc;

use enroll_api::{ApiError, RegistrationService};
use enroll_types::{FieldSet, RegistrationResponse, SubmissionPayload};
use tracing::{info, warn};

use crate::controller::StepController;

/// Title of the notification shown when a submission fails.
pub const FAILURE_TITLE: &str = "Oops!";
/// Message shown when no logical answer came back from the service.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Could not reach the registration service. Please try again.";

/// Presenter of submission feedback.
///
/// At most one notification is visible; each `show_*` call replaces the
/// previous one and [`NotificationSink::close`] dismisses it.
pub trait NotificationSink {
    /// Show a "please wait" indicator that blocks user input.
    fn show_blocking_wait(&mut self);
    fn show_success(&mut self, message: &str);
    fn show_error(&mut self, title: &str, message: &str);
    fn close(&mut self);
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The service accepted the registration; the wizard was reset.
    Succeeded { message: String },
    /// The service answered with `success` false or absent; state kept.
    Rejected { message: String },
    /// No logical answer was obtained; state kept.
    TransportFailed,
    /// A submission was already outstanding, so this one was dropped.
    Ignored,
}

/// Drives a submission against a [`RegistrationService`].
#[derive(Clone)]
pub struct SubmissionCoordinator {
    service: Arc<dyn RegistrationService>,
}

impl SubmissionCoordinator {
    pub fn new(service: Arc<dyn RegistrationService>) -> Self {
        Self { service }
    }

    /// Handle to the service, for callers that send the request on their own task.
    pub fn service(&self) -> Arc<dyn RegistrationService> {
        Arc::clone(&self.service)
    }

    /// Start a submission of `merged`.
    ///
    /// Returns `None` without touching anything when a submission is already
    /// outstanding.
    pub fn begin(
        &self,
        controller: &mut StepController,
        sink: &mut dyn NotificationSink,
        merged: &FieldSet,
    ) -> Option<SubmissionPayload> {
        if controller.is_submitting() {
            warn!("submission already in flight; dropping duplicate request");
            return None;
        }
        let payload = SubmissionPayload::from_fields(merged);
        controller.set_submitting(true);
        sink.show_blocking_wait();
        Some(payload)
    }

    /// Settle the outstanding submission with the service's result.
    pub fn finish(
        &self,
        controller: &mut StepController,
        sink: &mut dyn NotificationSink,
        result: Result<RegistrationResponse, ApiError>,
    ) -> SubmissionOutcome {
        sink.close();
        controller.set_submitting(false);
        match result {
            Ok(response) if response.is_success() => {
                let message = response.message().to_string();
                info!("registration accepted");
                sink.show_success(&message);
                controller.reset();
                SubmissionOutcome::Succeeded { message }
            }
            Ok(response) => {
                let message = response.message().to_string();
                info!(reason = %message, "registration rejected by service");
                sink.show_error(FAILURE_TITLE, &message);
                SubmissionOutcome::Rejected { message }
            }
            Err(error) => {
                warn!(error = %error, "registration request failed");
                sink.show_error(FAILURE_TITLE, TRANSPORT_FAILURE_MESSAGE);
                SubmissionOutcome::TransportFailed
            }
        }
    }

    /// Run a whole submission in place.
    pub async fn submit(
        &self,
        controller: &mut StepController,
        sink: &mut dyn NotificationSink,
        merged: &FieldSet,
    ) -> SubmissionOutcome {
        let Some(payload) = self.begin(controller, sink, merged) else {
            return SubmissionOutcome::Ignored;
        };
        let result = self.service.register(&payload).await;
        self.finish(controller, sink, result)
    }
}
