//! # Enroll Engine
//!
//! The logic behind the two-step registration wizard, independent of any
//! presentation layer.
//!
//! ## Architecture
//!
//! - **`validation`**: step-scoped field rules producing an [`ErrorMap`]
//! - **`store`**: derivation of input defaults and merging of captured values
//! - **`controller`**: the [`StepController`] owning [`WizardState`] and
//!   gating transitions on validation
//! - **`submission`**: the [`SubmissionCoordinator`] driving the async
//!   submit lifecycle against a [`RegistrationService`] and a
//!   [`NotificationSink`]
//!
//! [`ErrorMap`]: enroll_types::ErrorMap
//! [`RegistrationService`]: enroll_api::RegistrationService

pub mod controller;
pub mod store;
pub mod submission;
pub mod validation;

pub use controller::{StepController, Transition, WizardState};
pub use store::FormDataStore;
pub use submission::{NotificationSink, SubmissionCoordinator, SubmissionOutcome};
pub use validation::ValidationEngine;
