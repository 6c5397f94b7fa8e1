//! Platform ports: time and user-facing feedback.

use chrono::{DateTime, Utc};

/// Source of the current time. The pointer front-end uses it to expire
/// rejection highlights.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    Info,
    Warning,
}

/// Transient notifications ("toasts"). Optional: front-ends work without one.
#[cfg_attr(test, mockall::automock)]
pub trait FeedbackPort: Send + Sync {
    fn notify(&self, level: FeedbackLevel, message: &str);
}
