//! SkillEntry entity - a skill placed on the character's ladder
//!
//! Entries exist only while placed. Moving a skill back to the pool destroys
//! the entry; the pool itself is derived from the skill bank.

use serde::{Deserialize, Serialize};

use crate::common::name_key;
use crate::ids::SkillEntryId;

/// A ranked skill on the ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: SkillEntryId,
    pub name: String,
    pub rank: i32,
    /// Locked entries are never moved or removed by placement or redistribution
    #[serde(default)]
    pub locked: bool,
    /// True when a person, not the generator, last set this entry
    #[serde(default)]
    pub user_edited: bool,
}

impl SkillEntry {
    pub fn new(id: impl Into<SkillEntryId>, name: impl Into<String>, rank: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank,
            locked: false,
            user_edited: false,
        }
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_user_edited(mut self, user_edited: bool) -> Self {
        self.user_edited = user_edited;
        self
    }

    /// Case-insensitive key used for duplicate detection.
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    pub fn is_well_formed(&self) -> bool {
        !self.id.is_blank() && !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_flags_to_false() {
        let entry = SkillEntry::new("skill-fight", "Fight", 4);
        assert!(!entry.locked);
        assert!(!entry.user_edited);
    }

    #[test]
    fn test_well_formed_requires_id_and_name() {
        assert!(SkillEntry::new("skill-fight", "Fight", 4).is_well_formed());
        assert!(!SkillEntry::new("", "Fight", 4).is_well_formed());
        assert!(!SkillEntry::new("skill-x", "   ", 4).is_well_formed());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let entry = SkillEntry::new("skill-fight", "Fight", 4).with_user_edited(true);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["userEdited"], true);
        assert_eq!(json["rank"], 4);

        let parsed: SkillEntry =
            serde_json::from_str(r#"{"id":"skill-lore","name":"Lore","rank":2}"#).unwrap();
        assert!(!parsed.user_edited);
        assert!(!parsed.locked);
    }
}
