//! Aggregate roots - domain objects that own their related data
//!
//! The character sheet is a single aggregate. It owns its descriptors, ladder
//! entries and abilities, exposes behavior through methods, and keeps its
//! fields private.

pub mod character_state;

pub use character_state::{CharacterMeta, CharacterState, LadderRow, MetadataPatch, StateReplacement};
