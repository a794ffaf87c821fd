//! UI components: the wizard form and the notification modal.

pub mod common;
pub mod component;
pub mod notification;
pub mod wizard;

pub(crate) use component::Component;
pub use notification::NotificationModal;
pub use wizard::WizardComponent;
