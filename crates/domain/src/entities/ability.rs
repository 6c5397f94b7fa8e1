//! Ability entity - a Fate stunt

use serde::{Deserialize, Serialize};

use crate::ids::AbilityId;

/// A named special capability. Text may repeat across abilities; only the
/// identity tells two abilities apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub user_edited: bool,
}

impl Ability {
    pub fn new(id: impl Into<AbilityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            locked: false,
            user_edited: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Stunts only need an identity; a nameless stunt with a description is
    /// still usable.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_blank()
            && !(self.name.trim().is_empty() && self.description.trim().is_empty())
    }
}
