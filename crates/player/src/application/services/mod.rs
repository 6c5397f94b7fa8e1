//! Application services
//!
//! Services depend on port traits, not concrete infrastructure
//! implementations.

pub mod generation_service;
pub mod suggestion_merge;

pub use generation_service::{
    apply_response, GenerationControl, GenerationOutcome, GenerationService,
};
pub use suggestion_merge::{MergeReport, Merged, MAX_EXTRA_DESCRIPTORS};
