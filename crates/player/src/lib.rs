//! FateSheet Player crate.
//!
//! The client side of the character sheet editor: the entity store with
//! change subscriptions, the placement engine, the interaction front-ends and
//! the generation service with its HTTP adapter.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

pub use application::{GenerationOutcome, GenerationService, PlacementEngine};
pub use config::{ConfigError, PlayerConfig};
pub use state::{SheetStore, Subscription};
pub use ui::{create_front_end, InteractionMode, PlacementFrontEnd};
