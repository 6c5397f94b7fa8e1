//! Application layer: use cases over the sheet store.

pub mod placement;
pub mod services;

pub use placement::{is_pinned, PlacementEngine};
pub use services::{GenerationControl, GenerationOutcome, GenerationService, MergeReport};
