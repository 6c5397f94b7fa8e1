//! CharacterState aggregate - the whole character sheet being edited
//!
//! # Invariants
//!
//! - The two mandatory descriptors (High Concept, Trouble) exist exactly once
//!   each and always come first.
//! - Every setter filters malformed items instead of failing the batch.
//!
//! The aggregate does not enforce the pyramid rule or name uniqueness on the
//! ladder. `set_skills` is the raw commit primitive; placement and
//! redistribution validate before calling it.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::common::name_key;
use crate::entities::{Ability, Descriptor, MandatoryDescriptor, SkillEntry};
use crate::value_objects::{default_skill_bank, rank_label, sanitize_skill_bank, LadderType};

/// Character metadata: the generation prompt and the ladder frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMeta {
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub setting: String,
    #[serde(default)]
    pub ladder_type: LadderType,
    #[serde(default = "default_skill_bank")]
    pub skill_bank: Vec<String>,
}

impl Default for CharacterMeta {
    fn default() -> Self {
        Self {
            idea: String::new(),
            setting: String::new(),
            ladder_type: LadderType::default(),
            skill_bank: default_skill_bank(),
        }
    }
}

/// Partial metadata update. Absent fields keep their current value.
///
/// The skill bank is not part of the patch; it goes through
/// [`CharacterState::set_skill_bank`] so it is always sanitized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataPatch {
    pub idea: Option<String>,
    pub setting: Option<String>,
    pub ladder_type: Option<LadderType>,
}

impl MetadataPatch {
    pub fn idea(mut self, idea: impl Into<String>) -> Self {
        self.idea = Some(idea.into());
        self
    }

    pub fn setting(mut self, setting: impl Into<String>) -> Self {
        self.setting = Some(setting.into());
        self
    }

    pub fn ladder_type(mut self, ladder_type: LadderType) -> Self {
        self.ladder_type = Some(ladder_type);
        self
    }
}

/// Wholesale replacement used when loading externally supplied content.
/// Absent parts keep the current values; present parts are sanitized by the
/// matching setter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateReplacement {
    pub meta: Option<CharacterMeta>,
    pub descriptors: Option<Vec<Descriptor>>,
    pub skills: Option<Vec<SkillEntry>>,
    pub abilities: Option<Vec<Ability>>,
}

/// One row of the ladder view: a rank, its caption and the entries at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderRow<'a> {
    pub rank: i32,
    pub label: String,
    pub entries: Vec<&'a SkillEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    meta: CharacterMeta,
    descriptors: Vec<Descriptor>,
    skills: Vec<SkillEntry>,
    abilities: Vec<Ability>,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterState {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Blank sheet: default metadata, empty mandatory descriptors.
    pub fn new() -> Self {
        Self {
            meta: CharacterMeta::default(),
            descriptors: mandatory_descriptors(),
            skills: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn with_meta(mut self, meta: CharacterMeta) -> Self {
        self.meta = meta;
        let bank = std::mem::take(&mut self.meta.skill_bank);
        self.set_skill_bank(Some(bank));
        self
    }

    pub fn with_descriptors(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.set_descriptors(descriptors);
        self
    }

    pub fn with_skills(mut self, skills: Vec<SkillEntry>) -> Self {
        self.set_skills(skills);
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.set_abilities(abilities);
        self
    }

    /// Fixed demo character: a wandering swordsman on a 1-4 ladder.
    pub fn sample() -> Self {
        Self::new()
            .with_meta(CharacterMeta {
                idea: "Wandering swordsman seeking redemption".to_string(),
                setting: "Low fantasy".to_string(),
                ladder_type: LadderType::OneToFour,
                skill_bank: default_skill_bank(),
            })
            .with_descriptors(vec![
                Descriptor::mandatory(MandatoryDescriptor::HighConcept)
                    .with_description("Haunted Ronin on a Redemption Path"),
                Descriptor::mandatory(MandatoryDescriptor::Trouble)
                    .with_description("Past Sins Catch Up at the Worst Time"),
            ])
            .with_skills(vec![
                SkillEntry::new("skill-fight", "Fight", 3),
                SkillEntry::new("skill-notice", "Notice", 2),
                SkillEntry::new("skill-stealth", "Stealth", 1),
            ])
            .with_abilities(vec![Ability::new("stunt-1", "Iaijutsu Strike")
                .with_description("+2 to Fight when acting first in a duel.")])
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn meta(&self) -> &CharacterMeta {
        &self.meta
    }

    pub fn ladder_type(&self) -> LadderType {
        self.meta.ladder_type
    }

    pub fn skill_bank(&self) -> &[String] {
        &self.meta.skill_bank
    }

    /// Mandatory descriptors first, then extras.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn descriptor(&self, id: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.id.as_str() == id)
    }

    pub fn mandatory_descriptor(&self, which: MandatoryDescriptor) -> Option<&Descriptor> {
        self.descriptor(which.id_str())
    }

    pub fn extra_descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter().filter(|d| !d.is_mandatory())
    }

    pub fn skill(&self, id: &str) -> Option<&SkillEntry> {
        self.skills.iter().find(|s| s.id.as_str() == id)
    }

    pub fn skill_by_name(&self, name: &str) -> Option<&SkillEntry> {
        let key = name_key(name);
        self.skills.iter().find(|s| s.name_key() == key)
    }

    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id.as_str() == id)
    }

    /// Bank names not currently on the ladder, in bank order.
    pub fn pool(&self) -> Vec<String> {
        let placed: HashSet<String> = self.skills.iter().map(SkillEntry::name_key).collect();
        self.meta
            .skill_bank
            .iter()
            .filter(|name| !placed.contains(&name_key(name)))
            .cloned()
            .collect()
    }

    /// Entries grouped by rank, highest rank first. Every rank of the active
    /// ladder gets a row, even when empty.
    pub fn ladder_rows(&self) -> Vec<LadderRow<'_>> {
        self.meta
            .ladder_type
            .ranks()
            .iter()
            .map(|&rank| LadderRow {
                rank,
                label: rank_label(rank),
                entries: self.skills.iter().filter(|s| s.rank == rank).collect(),
            })
            .collect()
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn apply_metadata(&mut self, patch: MetadataPatch) {
        if let Some(idea) = patch.idea {
            self.meta.idea = idea;
        }
        if let Some(setting) = patch.setting {
            self.meta.setting = setting;
        }
        if let Some(ladder_type) = patch.ladder_type {
            self.meta.ladder_type = ladder_type;
        }
    }

    /// Switch the ladder frame. Existing entries are left as they are.
    pub fn change_ladder_type(&mut self, ladder_type: LadderType) {
        self.meta.ladder_type = ladder_type;
    }

    pub fn set_skill_bank(&mut self, bank: Option<Vec<String>>) {
        self.meta.skill_bank = sanitize_skill_bank(bank);
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Replace the ladder wholesale. Returns how many entries were dropped as
    /// malformed.
    pub fn set_skills(&mut self, skills: Vec<SkillEntry>) -> usize {
        let total = skills.len();
        self.skills = skills
            .into_iter()
            .filter(SkillEntry::is_well_formed)
            .collect();
        total - self.skills.len()
    }

    /// Replace the descriptor list. Mandatory descriptors missing from the
    /// input are carried over from the current state. Returns how many
    /// entries were dropped as malformed.
    pub fn set_descriptors(&mut self, descriptors: Vec<Descriptor>) -> usize {
        let total = descriptors.len();
        let well_formed: Vec<Descriptor> = descriptors
            .into_iter()
            .filter(Descriptor::is_well_formed)
            .collect();
        let dropped = total - well_formed.len();
        let deduped = dedupe_last_wins(well_formed, |d| d.id.clone());

        let mut ordered = Vec::with_capacity(deduped.len() + 2);
        for which in MandatoryDescriptor::ALL {
            let incoming = deduped.iter().find(|d| d.id.as_str() == which.id_str());
            let kept = incoming
                .or_else(|| self.mandatory_descriptor(which))
                .cloned()
                .unwrap_or_else(|| Descriptor::mandatory(which));
            ordered.push(kept);
        }
        ordered.extend(deduped.into_iter().filter(|d| !d.is_mandatory()));

        self.descriptors = ordered;
        dropped
    }

    /// Replace the ability list. Duplicated identities collapse onto the
    /// position of their first occurrence with the last value. Returns how
    /// many entries were dropped as malformed.
    pub fn set_abilities(&mut self, abilities: Vec<Ability>) -> usize {
        let total = abilities.len();
        let well_formed: Vec<Ability> = abilities
            .into_iter()
            .filter(Ability::is_well_formed)
            .collect();
        let dropped = total - well_formed.len();
        self.abilities = dedupe_last_wins(well_formed, |a| a.id.clone());
        dropped
    }

    /// Apply a [`StateReplacement`]; present parts go through their setters.
    pub fn replace(&mut self, replacement: StateReplacement) {
        if let Some(meta) = replacement.meta {
            let bank = meta.skill_bank.clone();
            self.meta = meta;
            self.set_skill_bank(Some(bank));
        }
        if let Some(descriptors) = replacement.descriptors {
            self.set_descriptors(descriptors);
        }
        if let Some(skills) = replacement.skills {
            self.set_skills(skills);
        }
        if let Some(abilities) = replacement.abilities {
            self.set_abilities(abilities);
        }
    }

    /// Empty the sheet for a new character. Metadata is kept.
    pub fn reset_for_new_character(&mut self) {
        self.descriptors = mandatory_descriptors();
        self.skills.clear();
        self.abilities.clear();
    }

    // =========================================================================
    // Descriptor edits
    // =========================================================================

    /// Returns false when the descriptor is missing or locked.
    pub fn update_descriptor_text(&mut self, id: &str, text: &str, mark_edited: bool) -> bool {
        match self.descriptor_mut(id) {
            Some(d) if !d.locked => {
                d.description = text.to_string();
                if mark_edited {
                    d.user_edited = true;
                }
                true
            }
            _ => false,
        }
    }

    /// Rename an extra descriptor. Mandatory names are fixed.
    pub fn rename_descriptor(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.descriptor_mut(id) {
            Some(d) if !d.locked && !d.is_mandatory() => {
                d.name = name.to_string();
                d.user_edited = true;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_descriptor_lock(&mut self, id: &str) -> bool {
        match self.descriptor_mut(id) {
            Some(d) => {
                d.locked = !d.locked;
                true
            }
            None => false,
        }
    }

    /// No-op for mandatory and locked descriptors.
    pub fn remove_descriptor(&mut self, id: &str) -> bool {
        let removable = self
            .descriptor(id)
            .is_some_and(|d| !d.is_mandatory() && !d.locked);
        if removable {
            self.descriptors.retain(|d| d.id.as_str() != id);
        }
        removable
    }

    /// Append an extra descriptor. Rejects malformed descriptors, reserved
    /// identities and identities already in use.
    pub fn add_descriptor(&mut self, descriptor: Descriptor) -> bool {
        if !descriptor.is_well_formed()
            || descriptor.is_mandatory()
            || self.descriptor(descriptor.id.as_str()).is_some()
        {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    // =========================================================================
    // Ability edits
    // =========================================================================

    pub fn update_ability_text(&mut self, id: &str, text: &str, mark_edited: bool) -> bool {
        match self.ability_mut(id) {
            Some(a) if !a.locked => {
                a.description = text.to_string();
                if mark_edited {
                    a.user_edited = true;
                }
                true
            }
            _ => false,
        }
    }

    pub fn rename_ability(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.ability_mut(id) {
            Some(a) if !a.locked => {
                a.name = name.to_string();
                a.user_edited = true;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_ability_lock(&mut self, id: &str) -> bool {
        match self.ability_mut(id) {
            Some(a) => {
                a.locked = !a.locked;
                true
            }
            None => false,
        }
    }

    pub fn remove_ability(&mut self, id: &str) -> bool {
        let removable = self.ability(id).is_some_and(|a| !a.locked);
        if removable {
            self.abilities.retain(|a| a.id.as_str() != id);
        }
        removable
    }

    pub fn add_ability(&mut self, ability: Ability) -> bool {
        if !ability.is_well_formed() || self.ability(ability.id.as_str()).is_some() {
            return false;
        }
        self.abilities.push(ability);
        true
    }

    // =========================================================================
    // Skill edits
    // =========================================================================

    pub fn toggle_skill_lock(&mut self, id: &str) -> bool {
        match self.skills.iter_mut().find(|s| s.id.as_str() == id) {
            Some(s) => {
                s.locked = !s.locked;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn descriptor_mut(&mut self, id: &str) -> Option<&mut Descriptor> {
        self.descriptors.iter_mut().find(|d| d.id.as_str() == id)
    }

    fn ability_mut(&mut self, id: &str) -> Option<&mut Ability> {
        self.abilities.iter_mut().find(|a| a.id.as_str() == id)
    }
}

fn mandatory_descriptors() -> Vec<Descriptor> {
    MandatoryDescriptor::ALL
        .into_iter()
        .map(Descriptor::mandatory)
        .collect()
}

/// Collapse items sharing a key: the last value wins, at the position of the
/// first occurrence.
fn dedupe_last_wins<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&idx) => out[idx] = item,
            None => {
                positions.insert(k, out.len());
                out.push(item);
            }
        }
    }
    out
}
