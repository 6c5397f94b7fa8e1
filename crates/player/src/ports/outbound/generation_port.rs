//! GenerationPort - Boundary to the generative text backend
//!
//! One call per `GenerationRequest`. Adapters build the wire body, post it to
//! the mode's endpoint and decode the response for that mode. Timeouts and
//! in-flight tracking belong to the caller.

use async_trait::async_trait;
use thiserror::Error;

use fatesheet_shared::{GenerationRequest, GenerationResponse, ProtocolError};

/// Failure of a generation round trip. None of these leave the sheet
/// partially updated: responses are applied only after a successful call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{mode} generation timed out after {seconds}s")]
    Timeout { mode: &'static str, seconds: u64 },

    #[error("a {0} request is already in flight")]
    AlreadyInFlight(&'static str),

    #[error("request failed: {0}")]
    Http(String),

    #[error("backend returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { .. } => "Generation took too long. Please try again.".to_string(),
            Self::AlreadyInFlight(_) => "Still working on the previous request.".to_string(),
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => "Generation failed. Please try again.".to_string(),
        }
    }
}

impl From<ProtocolError> for GenerationError {
    fn from(err: ProtocolError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationPort: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, GenerationError>;
}
