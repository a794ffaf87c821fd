mod notification_modal;

pub use notification_modal::NotificationModal;
