//! Character wire format and conversions to and from the domain aggregate.
//!
//! Every field the backend might omit is optional here. Conversion into the
//! domain filters items that lack an identity, a name or a rank and logs
//! each drop; one bad item never discards the rest of the batch.

use serde::{Deserialize, Serialize};

use fatesheet_domain::{
    Ability, CharacterMeta, CharacterState, Descriptor, LadderType, MandatoryDescriptor,
    SkillEntry, StateReplacement,
};

/// Metadata block of a character payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPayload {
    #[serde(default)]
    pub idea: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_bank: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_edited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_edited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StuntPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_edited: Option<bool>,
}

/// Full character as sent to and received from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPayload {
    pub meta: MetaPayload,
    #[serde(default)]
    pub aspects: Vec<AspectPayload>,
    #[serde(default)]
    pub skills: Vec<SkillPayload>,
    #[serde(default)]
    pub stunts: Vec<StuntPayload>,
}

// =============================================================================
// Domain -> wire
// =============================================================================

impl From<&CharacterState> for CharacterPayload {
    fn from(state: &CharacterState) -> Self {
        let meta = state.meta();
        Self {
            meta: MetaPayload {
                idea: meta.idea.clone(),
                setting: Some(meta.setting.clone()).filter(|s| !s.is_empty()),
                ladder_type: Some(meta.ladder_type.as_str().to_string()),
                skill_bank: Some(meta.skill_bank.clone()),
            },
            aspects: state.descriptors().iter().map(AspectPayload::from).collect(),
            skills: state.skills().iter().map(SkillPayload::from).collect(),
            stunts: state.abilities().iter().map(StuntPayload::from).collect(),
        }
    }
}

impl From<&Descriptor> for AspectPayload {
    fn from(d: &Descriptor) -> Self {
        Self {
            id: Some(d.id.to_string()),
            name: Some(d.name.clone()),
            description: Some(d.description.clone()),
            locked: Some(d.locked),
            user_edited: Some(d.user_edited),
        }
    }
}

impl From<&SkillEntry> for SkillPayload {
    fn from(s: &SkillEntry) -> Self {
        Self {
            id: Some(s.id.to_string()),
            name: Some(s.name.clone()),
            rank: Some(s.rank),
            locked: Some(s.locked),
            user_edited: Some(s.user_edited),
        }
    }
}

impl From<&Ability> for StuntPayload {
    fn from(a: &Ability) -> Self {
        Self {
            id: Some(a.id.to_string()),
            name: Some(a.name.clone()),
            description: Some(a.description.clone()),
            locked: Some(a.locked),
            user_edited: Some(a.user_edited),
        }
    }
}

// =============================================================================
// Wire -> domain
// =============================================================================

impl MetaPayload {
    /// Unknown ladder types fall back to the default with a warning.
    pub fn into_domain(self) -> CharacterMeta {
        let ladder_type = match self.ladder_type.as_deref() {
            None => LadderType::default(),
            Some(raw) => raw.parse::<LadderType>().unwrap_or_else(|e| {
                tracing::warn!(ladder_type = raw, error = %e, "Unknown ladder type, using default");
                LadderType::default()
            }),
        };
        let mut meta = CharacterMeta {
            idea: self.idea,
            setting: self.setting.unwrap_or_default(),
            ladder_type,
            ..CharacterMeta::default()
        };
        if let Some(bank) = self.skill_bank {
            meta.skill_bank = bank;
        }
        meta
    }
}

impl AspectPayload {
    /// Aspects named "High Concept" or "Trouble" without a reserved identity
    /// are mapped onto the reserved one.
    pub fn into_domain(self) -> Option<Descriptor> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let id = self.id.filter(|i| !i.trim().is_empty());
        let (Some(id), Some(name)) = (id, name) else {
            tracing::warn!("Dropping aspect without id or name");
            return None;
        };
        let id = MandatoryDescriptor::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(name.trim()))
            .map(|m| m.id_str().to_string())
            .unwrap_or(id);
        Some(Descriptor {
            id: id.into(),
            name,
            description: self.description.unwrap_or_default(),
            locked: self.locked.unwrap_or(false),
            user_edited: self.user_edited.unwrap_or(false),
        })
    }
}

impl SkillPayload {
    pub fn into_domain(self) -> Option<SkillEntry> {
        let id = self.id.filter(|i| !i.trim().is_empty());
        let name = self.name.filter(|n| !n.trim().is_empty());
        let (Some(id), Some(name), Some(rank)) = (id, name, self.rank) else {
            tracing::warn!("Dropping skill without id, name or rank");
            return None;
        };
        Some(SkillEntry {
            id: id.into(),
            name,
            rank,
            locked: self.locked.unwrap_or(false),
            user_edited: self.user_edited.unwrap_or(false),
        })
    }
}

impl StuntPayload {
    pub fn into_domain(self) -> Option<Ability> {
        let Some(id) = self.id.filter(|i| !i.trim().is_empty()) else {
            tracing::warn!("Dropping stunt without id");
            return None;
        };
        let ability = Ability {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            locked: self.locked.unwrap_or(false),
            user_edited: self.user_edited.unwrap_or(false),
        };
        if !ability.is_well_formed() {
            tracing::warn!(id = %ability.id, "Dropping stunt without content");
            return None;
        }
        Some(ability)
    }
}

impl CharacterPayload {
    /// Convert into a replacement for the store. Malformed items are dropped.
    pub fn into_replacement(self) -> StateReplacement {
        StateReplacement {
            meta: Some(self.meta.into_domain()),
            descriptors: Some(
                self.aspects
                    .into_iter()
                    .filter_map(AspectPayload::into_domain)
                    .collect(),
            ),
            skills: Some(
                self.skills
                    .into_iter()
                    .filter_map(SkillPayload::into_domain)
                    .collect(),
            ),
            abilities: Some(
                self.stunts
                    .into_iter()
                    .filter_map(StuntPayload::into_domain)
                    .collect(),
            ),
        }
    }
}
