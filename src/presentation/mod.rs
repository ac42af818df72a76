//! State owner behind the operator-facing views.

pub mod directory;
pub mod notification;

pub use directory::{Submission, UserDirectory};
pub use notification::{Notification, NotificationLevel, Notifier, TracingNotifier};
