//! Infrastructure adapters for the player ports.

pub mod clock;
pub mod feedback;
pub mod http_client;

pub use clock::SystemClock;
pub use feedback::LogFeedback;
pub use http_client::HttpGenerationClient;
