//! Domain model for the Fate character sheet editor.
//!
//! Pure and synchronous: no I/O, no clocks, no logging. The player crate owns
//! state and side effects and calls into this crate for every rule.

pub mod aggregates;
pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod skill_ladder;
pub mod value_objects;

pub use aggregates::{CharacterMeta, CharacterState, LadderRow, MetadataPatch, StateReplacement};
pub use entities::{Ability, Descriptor, MandatoryDescriptor, SkillEntry};
pub use error::DomainError;
pub use ids::{
    skill_id_for, AbilityId, DescriptorId, IdGenerator, SequentialIdGenerator, SkillEntryId,
    UuidIdGenerator, HIGH_CONCEPT_ID, TROUBLE_ID,
};
pub use skill_ladder::{
    fit_to_pyramid, is_valid_distribution, refit_preserving, PlacementOutcome, PlacementSource,
};
pub use value_objects::{canonicalize_skill_name, default_skill_bank, rank_label, LadderType};
