//! Value objects - Immutable objects defined by their attributes

mod ladder;
mod skill_bank;

pub use ladder::{rank_label, LadderType};
pub use skill_bank::{
    canonicalize_skill_name, default_skill_bank, sanitize_skill_bank, DEFAULT_SKILL_BANK,
};
