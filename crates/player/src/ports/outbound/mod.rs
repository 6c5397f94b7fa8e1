//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod generation_port;
pub mod platform;

pub use generation_port::{GenerationError, GenerationPort};
pub use platform::{ClockPort, FeedbackLevel, FeedbackPort};

#[cfg(test)]
pub use generation_port::MockGenerationPort;
#[cfg(test)]
pub use platform::{MockClockPort, MockFeedbackPort};
