//! Entities - objects with identity that live inside the character aggregate

mod ability;
mod descriptor;
mod skill_entry;

pub use ability::Ability;
pub use descriptor::{Descriptor, MandatoryDescriptor};
pub use skill_entry::SkillEntry;
