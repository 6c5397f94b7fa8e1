//! Feedback adapter for headless runs: notifications go to the log.

use crate::ports::outbound::{FeedbackLevel, FeedbackPort};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl FeedbackPort for LogFeedback {
    fn notify(&self, level: FeedbackLevel, message: &str) {
        match level {
            FeedbackLevel::Info => tracing::info!(target: "feedback", "{message}"),
            FeedbackLevel::Warning => tracing::warn!(target: "feedback", "{message}"),
        }
    }
}
