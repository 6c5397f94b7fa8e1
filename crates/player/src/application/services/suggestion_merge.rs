//! Merging generated suggestions into the sheet
//!
//! Each function reads the current state and returns a [`Merged`] holding a
//! `StateReplacement` with only the parts it touched, so a response is applied
//! in a single store operation or not at all.
//!
//! Suggestions carrying the identity of an existing item update that item's
//! present fields; anything else is a new item. Protected items (locked, or
//! hand-edited while overwrites are off) are never touched.

use std::collections::HashSet;

use fatesheet_domain::common::{name_key, non_blank, normalize_text};
use fatesheet_domain::skill_ladder::{fit_to_pyramid, is_valid_distribution, refit_preserving};
use fatesheet_domain::{
    canonicalize_skill_name, Ability, CharacterState, Descriptor, IdGenerator, MandatoryDescriptor,
    SkillEntry, StateReplacement,
};
use fatesheet_shared::{AspectSuggestion, SkeletonResponse, SkillSuggestion, StuntSuggestion};

use crate::application::placement::is_pinned;
use crate::ports::outbound::GenerationError;

/// Extra descriptors a character may receive from generation.
pub const MAX_EXTRA_DESCRIPTORS: usize = 3;

const DEFAULT_STUNT_NAME: &str = "Stunt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub updated: usize,
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Merged {
    pub replacement: StateReplacement,
    pub report: MergeReport,
}

impl Merged {
    pub fn is_empty(&self) -> bool {
        let r = &self.replacement;
        r.meta.is_none() && r.descriptors.is_none() && r.skills.is_none() && r.abilities.is_none()
    }
}

/// How descriptor suggestions are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorMerge {
    /// New text for one mandatory descriptor.
    Regenerate(MandatoryDescriptor),
    /// Updates plus up to `limit` new extras.
    Propose { limit: usize },
}

fn is_protected(locked: bool, user_edited: bool, allow_overwrite: bool) -> bool {
    locked || (user_edited && !allow_overwrite)
}

fn suggested_id(id: &Option<String>) -> Option<&str> {
    id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

/// Apply a skeleton: mandatory descriptor texts plus a ladder fitted from the
/// ranked skills. Skills the bank does not know are dropped. Pinned skills
/// stay as they are and the fitted ladder is reshaped around them; fails when
/// that cannot produce a valid ladder, so nothing is applied.
pub fn ingest_skeleton(
    state: &CharacterState,
    response: SkeletonResponse,
    allow_overwrite: bool,
) -> Result<Merged, GenerationError> {
    let mut report = MergeReport::default();

    let mut descriptors = state.descriptors().to_vec();
    for (which, text) in [
        (MandatoryDescriptor::HighConcept, &response.high_concept),
        (MandatoryDescriptor::Trouble, &response.trouble),
    ] {
        let target = descriptors
            .iter_mut()
            .find(|d| d.id.as_str() == which.id_str());
        match (target, non_blank(text)) {
            (Some(d), Some(text)) if !is_protected(d.locked, d.user_edited, allow_overwrite) => {
                d.description = text;
                d.user_edited = false;
                report.updated += 1;
            }
            _ => report.skipped += 1,
        }
    }

    let skills = if response.skills.is_empty() {
        None
    } else {
        let ladder = state.ladder_type();
        let bank = state.skill_bank();
        let pinned = |e: &SkillEntry| is_pinned(e, allow_overwrite);

        let mut candidate: Vec<SkillEntry> =
            state.skills().iter().filter(|e| pinned(*e)).cloned().collect();
        let pinned_keys: HashSet<String> = candidate.iter().map(SkillEntry::name_key).collect();

        let ranked: Vec<SkillEntry> = response
            .skills
            .into_iter()
            .filter_map(|s| match canonicalize_skill_name(&s.name, bank) {
                Some(name) if pinned_keys.contains(&name_key(&name)) => {
                    report.skipped += 1;
                    None
                }
                Some(name) => Some(SkillEntry::new("", name, s.rank)),
                None => {
                    tracing::warn!(skill = %s.name, "Dropping generated skill outside the bank");
                    report.skipped += 1;
                    None
                }
            })
            .collect();
        let fitted = fit_to_pyramid(&ranked, ladder);
        report.added += fitted.len();
        candidate.extend(fitted);

        let refit = refit_preserving(&candidate, ladder, pinned);
        if !is_valid_distribution(&refit, ladder) {
            return Err(GenerationError::InvalidResponse(
                "generated skeleton cannot form a valid ladder around pinned skills".to_string(),
            ));
        }
        Some(refit)
    };

    Ok(Merged {
        replacement: StateReplacement {
            descriptors: Some(descriptors),
            skills,
            ..Default::default()
        },
        report,
    })
}

/// Merge descriptor suggestions.
pub fn merge_descriptors(
    state: &CharacterState,
    suggestions: Vec<AspectSuggestion>,
    merge: DescriptorMerge,
    allow_overwrite: bool,
    ids: &dyn IdGenerator,
) -> Merged {
    let mut report = MergeReport::default();
    let mut descriptors = state.descriptors().to_vec();

    match merge {
        DescriptorMerge::Regenerate(which) => {
            let text = suggestions
                .iter()
                .find_map(|s| s.description.as_deref().and_then(non_blank));
            let target = descriptors
                .iter_mut()
                .find(|d| d.id.as_str() == which.id_str());
            match (target, text) {
                (Some(d), Some(text)) if !is_protected(d.locked, d.user_edited, allow_overwrite) => {
                    d.description = text;
                    d.user_edited = false;
                    report.updated += 1;
                }
                _ => report.skipped += 1,
            }
        }
        DescriptorMerge::Propose { limit } => {
            let extras = state.extra_descriptors().count();
            let mut budget = limit.min(MAX_EXTRA_DESCRIPTORS.saturating_sub(extras));

            for suggestion in suggestions {
                let existing = suggested_id(&suggestion.id)
                    .and_then(|id| descriptors.iter_mut().find(|d| d.id.as_str() == id));
                if let Some(d) = existing {
                    if is_protected(d.locked, d.user_edited, allow_overwrite) {
                        report.skipped += 1;
                        continue;
                    }
                    if let Some(name) = suggestion.name.as_deref().and_then(non_blank) {
                        if !d.is_mandatory() {
                            d.name = name;
                        }
                    }
                    if let Some(description) = suggestion.description {
                        d.description = description.trim().to_string();
                    }
                    d.user_edited = false;
                    report.updated += 1;
                    continue;
                }

                let name = suggestion.name.as_deref().and_then(non_blank);
                let reserved = name.as_deref().is_some_and(|n| {
                    MandatoryDescriptor::ALL
                        .iter()
                        .any(|m| m.label().eq_ignore_ascii_case(n))
                });
                let Some(name) = name.filter(|_| budget > 0 && !reserved) else {
                    report.skipped += 1;
                    continue;
                };
                let id = fresh_id(ids, "aspect", |c| {
                    descriptors.iter().any(|d| d.id.as_str() == c)
                });
                descriptors.push(
                    Descriptor::new(id, name)
                        .with_description(suggestion.description.unwrap_or_default().trim()),
                );
                budget -= 1;
                report.added += 1;
            }
        }
    }

    Merged {
        replacement: StateReplacement {
            descriptors: Some(descriptors),
            ..Default::default()
        },
        report,
    }
}

/// Merge a skill proposal. Pinned entries stay; the proposal replaces the
/// rest of the ladder and is reshaped around the pinned entries. Fails when
/// no valid ladder can be built, so nothing is applied.
pub fn merge_skills(
    state: &CharacterState,
    suggestions: Vec<SkillSuggestion>,
    allow_overwrite: bool,
) -> Result<Merged, GenerationError> {
    if suggestions.is_empty() {
        return Ok(Merged::default());
    }

    let ladder = state.ladder_type();
    let bank = state.skill_bank();
    let pinned = |e: &SkillEntry| is_pinned(e, allow_overwrite);
    let mut report = MergeReport::default();

    let canonical = |name: String| canonicalize_skill_name(&name, bank).unwrap_or(name);

    let mut candidate: Vec<SkillEntry> =
        state.skills().iter().filter(|e| pinned(*e)).cloned().collect();
    for suggestion in suggestions {
        let existing = suggested_id(&suggestion.id).and_then(|id| state.skill(id));
        match existing {
            Some(entry) if pinned(entry) => report.skipped += 1,
            Some(entry) => {
                let mut entry = entry.clone();
                if let Some(name) = suggestion.name.as_deref().and_then(non_blank) {
                    entry.name = canonical(name);
                }
                if let Some(rank) = suggestion.rank {
                    entry.rank = rank;
                }
                entry.user_edited = false;
                candidate.push(entry);
                report.updated += 1;
            }
            None => {
                let Some(name) = suggestion.name.as_deref().and_then(non_blank) else {
                    report.skipped += 1;
                    continue;
                };
                let id = suggested_id(&suggestion.id).unwrap_or_default().to_string();
                let rank = suggestion.rank.unwrap_or_else(|| ladder.lowest_rank());
                candidate.push(SkillEntry::new(id, canonical(name), rank));
                report.added += 1;
            }
        }
    }

    let refit = refit_preserving(&candidate, ladder, pinned);
    if !is_valid_distribution(&refit, ladder) {
        return Err(GenerationError::InvalidResponse(
            "generated skills cannot form a valid ladder around pinned skills".to_string(),
        ));
    }

    Ok(Merged {
        replacement: StateReplacement {
            skills: Some(refit),
            ..Default::default()
        },
        report,
    })
}

/// Merge stunt suggestions, accepting at most `limit` new ones. New stunts
/// without a description, or whose description matches an existing or
/// already accepted one (case and whitespace aside), are dropped.
pub fn merge_stunts(
    state: &CharacterState,
    suggestions: Vec<StuntSuggestion>,
    limit: usize,
    allow_overwrite: bool,
    ids: &dyn IdGenerator,
) -> Merged {
    let mut report = MergeReport::default();
    let mut abilities = state.abilities().to_vec();
    let mut seen: HashSet<String> = abilities
        .iter()
        .map(|a| normalize_text(&a.description))
        .filter(|k| !k.is_empty())
        .collect();
    let mut budget = limit;

    for suggestion in suggestions {
        let existing = suggested_id(&suggestion.id)
            .and_then(|id| abilities.iter_mut().find(|a| a.id.as_str() == id));
        if let Some(a) = existing {
            if is_protected(a.locked, a.user_edited, allow_overwrite) {
                report.skipped += 1;
                continue;
            }
            if let Some(name) = suggestion.name.as_deref().and_then(non_blank) {
                a.name = name;
            }
            if let Some(description) = suggestion.description {
                a.description = description.trim().to_string();
                seen.insert(normalize_text(&a.description));
            }
            a.user_edited = false;
            report.updated += 1;
            continue;
        }

        let description = suggestion.description.unwrap_or_default().trim().to_string();
        let key = normalize_text(&description);
        if budget == 0 || key.is_empty() || !seen.insert(key) {
            report.skipped += 1;
            continue;
        }

        let name = suggestion
            .name
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_STUNT_NAME.to_string());
        let id = match suggested_id(&suggestion.id) {
            Some(id) => id.to_string(),
            None => fresh_id(ids, "stunt", |c| abilities.iter().any(|a| a.id.as_str() == c)),
        };
        abilities.push(Ability::new(id, name).with_description(description));
        budget -= 1;
        report.added += 1;
    }

    Merged {
        replacement: StateReplacement {
            abilities: Some(abilities),
            ..Default::default()
        },
        report,
    }
}

fn fresh_id(ids: &dyn IdGenerator, prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = ids.next_id(prefix);
        if !is_taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatesheet_domain::{LadderType, SequentialIdGenerator, HIGH_CONCEPT_ID, TROUBLE_ID};
    use fatesheet_shared::RankedSkill;

    fn aspect(id: Option<&str>, name: Option<&str>, description: Option<&str>) -> AspectSuggestion {
        AspectSuggestion {
            id: id.map(String::from),
            name: name.map(String::from),
            description: description.map(String::from),
        }
    }

    fn skill(id: Option<&str>, name: Option<&str>, rank: Option<i32>) -> SkillSuggestion {
        SkillSuggestion {
            id: id.map(String::from),
            name: name.map(String::from),
            rank,
        }
    }

    fn stunt(id: Option<&str>, name: Option<&str>, description: Option<&str>) -> StuntSuggestion {
        StuntSuggestion {
            id: id.map(String::from),
            name: name.map(String::from),
            description: description.map(String::from),
        }
    }

    fn ranked(name: &str, rank: i32) -> RankedSkill {
        RankedSkill {
            id: None,
            name: name.to_string(),
            rank,
        }
    }

    #[test]
    fn test_skeleton_sets_mandatory_text_and_fits_ladder() {
        let state = CharacterState::new();
        let merged = ingest_skeleton(
            &state,
            SkeletonResponse {
                high_concept: " Sky Pirate Captain ".to_string(),
                trouble: "Wanted in Three Ports".to_string(),
                skills: vec![
                    ranked("fight", 4),
                    ranked("Marksmanship", 3),
                    ranked("Sailing", 3),
                    ranked("Notice", 3),
                    ranked("FIGHT", 2),
                    ranked("Will", 2),
                    ranked("Rapport", 1),
                ],
            },
            false,
        )
        .unwrap();

        let mut next = state.clone();
        next.replace(merged.replacement);
        assert_eq!(
            next.descriptor(HIGH_CONCEPT_ID).unwrap().description,
            "Sky Pirate Captain"
        );

        let names: Vec<(&str, i32)> = next.skills().iter().map(|s| (s.name.as_str(), s.rank)).collect();
        assert_eq!(
            names,
            vec![("Fight", 4), ("Shoot", 3), ("Notice", 3), ("Will", 2), ("Rapport", 2)]
        );
        assert!(is_valid_distribution(next.skills(), LadderType::OneToFour));
        // "Sailing" is not in the bank.
        assert_eq!(merged.report.skipped, 1);
    }

    #[test]
    fn test_skeleton_respects_protected_descriptors() {
        let mut state = CharacterState::new();
        state.update_descriptor_text(TROUBLE_ID, "My own trouble", true);

        let response = SkeletonResponse {
            high_concept: "Generated".to_string(),
            trouble: "Generated trouble".to_string(),
            skills: Vec::new(),
        };

        let merged = ingest_skeleton(&state, response.clone(), false).unwrap();
        let descriptors = merged.replacement.descriptors.unwrap();
        assert_eq!(descriptors[1].description, "My own trouble");
        assert!(merged.replacement.skills.is_none());

        let merged = ingest_skeleton(&state, response, true).unwrap();
        let descriptors = merged.replacement.descriptors.unwrap();
        assert_eq!(descriptors[1].description, "Generated trouble");
        assert!(!descriptors[1].user_edited);
    }

    #[test]
    fn test_skeleton_keeps_pinned_skills() {
        let state = CharacterState::new().with_skills(vec![
            SkillEntry::new("skill-fight", "Fight", 1).with_locked(true),
            SkillEntry::new("skill-lore", "Lore", 1).with_user_edited(true),
            SkillEntry::new("skill-drive", "Drive", 1),
        ]);
        let response = SkeletonResponse {
            high_concept: "Sky Pirate Captain".to_string(),
            trouble: "Wanted in Three Ports".to_string(),
            skills: vec![ranked("Shoot", 4), ranked("Notice", 3), ranked("Will", 3), ranked("lore", 2)],
        };

        let merged = ingest_skeleton(&state, response, false).unwrap();
        let skills = merged.replacement.skills.unwrap();

        let fight = skills.iter().find(|s| s.name == "Fight");
        assert_eq!(fight.map(|s| (s.id.as_str(), s.rank, s.locked)), Some(("skill-fight", 1, true)));
        let lore = skills.iter().find(|s| s.name == "Lore");
        assert_eq!(lore.map(|s| (s.id.as_str(), s.rank, s.user_edited)), Some(("skill-lore", 1, true)));
        assert!(skills.iter().all(|s| s.name != "Drive"));
        assert_eq!(skills.iter().filter(|s| s.name_key() == "lore").count(), 1);
        assert!(is_valid_distribution(&skills, LadderType::OneToFour));
    }

    #[test]
    fn test_skeleton_fails_when_pinned_skills_cannot_be_balanced() {
        let state = CharacterState::new().with_skills(vec![
            SkillEntry::new("skill-fight", "Fight", 4).with_locked(true),
            SkillEntry::new("skill-shoot", "Shoot", 4).with_locked(true),
        ]);
        let response = SkeletonResponse {
            high_concept: "Sky Pirate Captain".to_string(),
            trouble: "Wanted in Three Ports".to_string(),
            skills: vec![ranked("Notice", 1)],
        };

        let result = ingest_skeleton(&state, response, true);
        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }

    #[test]
    fn test_merge_preserves_existing_ids_and_updates_fields() {
        let ids = SequentialIdGenerator::new();
        let state = CharacterState::new()
            .with_descriptors(vec![Descriptor::new("aspect-1", "Rival").with_description("Old Desc")])
            .with_skills(vec![SkillEntry::new("skill-1", "Fight", 1)])
            .with_abilities(vec![Ability::new("stunt-1", "Old Stunt").with_description("Old")]);

        let aspects = merge_descriptors(
            &state,
            vec![
                aspect(Some("aspect-1"), None, Some("New Desc")),
                aspect(None, Some("Brand New Aspect"), Some("Fresh")),
            ],
            DescriptorMerge::Propose { limit: 3 },
            false,
            &ids,
        );
        let descriptors = aspects.replacement.descriptors.unwrap();
        let updated = descriptors.iter().find(|d| d.id.as_str() == "aspect-1").unwrap();
        assert_eq!(updated.name, "Rival");
        assert_eq!(updated.description, "New Desc");
        let added = descriptors.last().unwrap();
        assert_eq!(added.name, "Brand New Aspect");
        // "aspect-1" is taken, so the generator moves on.
        assert_eq!(added.id.as_str(), "aspect-2");
        assert_eq!(aspects.report, MergeReport { updated: 1, added: 1, skipped: 0 });

        let skills = merge_skills(
            &state,
            vec![
                skill(Some("skill-1"), None, Some(2)),
                skill(None, Some("stealth"), Some(1)),
            ],
            false,
        )
        .unwrap();
        let skills = skills.replacement.skills.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills.iter().find(|s| s.id.as_str() == "skill-1").unwrap().rank, 2);
        let stealth = skills.iter().find(|s| s.name == "Stealth").unwrap();
        assert_eq!(stealth.id.as_str(), "skill-stealth");

        let stunts = merge_stunts(
            &state,
            vec![
                stunt(Some("stunt-1"), None, Some("Updated")),
                stunt(None, Some("New Stunt"), Some("Fresh")),
            ],
            1,
            false,
            &ids,
        );
        let abilities = stunts.replacement.abilities.unwrap();
        assert_eq!(abilities[0].description, "Updated");
        assert_eq!(abilities[0].name, "Old Stunt");
        assert_eq!(abilities[1].name, "New Stunt");
        assert!(!abilities[1].id.is_blank());
    }

    #[test]
    fn test_extra_descriptors_are_capped() {
        let ids = SequentialIdGenerator::new();
        let state = CharacterState::new().with_descriptors(vec![
            Descriptor::new("aspect-a", "One"),
            Descriptor::new("aspect-b", "Two"),
        ]);

        let merged = merge_descriptors(
            &state,
            vec![
                aspect(None, Some("Three"), Some("")),
                aspect(None, Some("Four"), Some("")),
            ],
            DescriptorMerge::Propose { limit: 5 },
            false,
            &ids,
        );

        let descriptors = merged.replacement.descriptors.unwrap();
        assert_eq!(descriptors.len(), 2 + MAX_EXTRA_DESCRIPTORS);
        assert_eq!(descriptors.last().unwrap().name, "Three");
        assert_eq!(merged.report.skipped, 1);
    }

    #[test]
    fn test_new_descriptor_cannot_take_mandatory_name() {
        let ids = SequentialIdGenerator::new();
        let merged = merge_descriptors(
            &CharacterState::new(),
            vec![aspect(None, Some("trouble"), Some("Sneaky"))],
            DescriptorMerge::Propose { limit: 1 },
            false,
            &ids,
        );
        assert_eq!(merged.replacement.descriptors.unwrap().len(), 2);
        assert_eq!(merged.report.skipped, 1);
    }

    #[test]
    fn test_regenerate_takes_first_non_blank_description() {
        let ids = SequentialIdGenerator::new();
        let merged = merge_descriptors(
            &CharacterState::sample(),
            vec![
                aspect(None, Some("High Concept"), Some("  ")),
                aspect(None, None, Some("Disgraced Duelist")),
            ],
            DescriptorMerge::Regenerate(MandatoryDescriptor::HighConcept),
            false,
            &ids,
        );
        let descriptors = merged.replacement.descriptors.unwrap();
        assert_eq!(descriptors[0].description, "Disgraced Duelist");
        assert_eq!(descriptors.len(), 2);
    }

    #[test]
    fn test_locked_items_are_not_touched() {
        let ids = SequentialIdGenerator::new();
        let state = CharacterState::sample().with_abilities(vec![
            Ability::new("stunt-1", "Iaijutsu Strike")
                .with_description("Original")
                .with_locked(true),
        ]);

        let merged = merge_stunts(
            &state,
            vec![stunt(Some("stunt-1"), Some("Renamed"), Some("Changed"))],
            1,
            true,
            &ids,
        );
        let abilities = merged.replacement.abilities.unwrap();
        assert_eq!(abilities[0].name, "Iaijutsu Strike");
        assert_eq!(abilities[0].description, "Original");
        assert_eq!(merged.report.skipped, 1);
    }

    #[test]
    fn test_generated_stunts_are_deduplicated() {
        let ids = SequentialIdGenerator::new();
        let state = CharacterState::sample();

        let merged = merge_stunts(
            &state,
            vec![
                stunt(None, Some("Copy"), Some("+2 to FIGHT when acting first   in a duel.")),
                stunt(None, Some("Empty"), Some("   ")),
                stunt(None, Some("Watchful"), Some("+2 to Notice in crowds.")),
                stunt(None, Some("Watchful Again"), Some("+2 to notice in crowds.")),
                stunt(None, None, Some("Use Will instead of Physique to resist poison.")),
            ],
            5,
            false,
            &ids,
        );

        let abilities = merged.replacement.abilities.unwrap();
        let names: Vec<&str> = abilities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Iaijutsu Strike", "Watchful", "Stunt"]);
        assert_eq!(abilities[1].id.as_str(), "stunt-2");
        assert_eq!(merged.report, MergeReport { updated: 0, added: 2, skipped: 3 });
    }

    #[test]
    fn test_stunt_limit() {
        let ids = SequentialIdGenerator::new();
        let merged = merge_stunts(
            &CharacterState::new(),
            vec![
                stunt(None, Some("A"), Some("First")),
                stunt(None, Some("B"), Some("Second")),
            ],
            1,
            false,
            &ids,
        );
        assert_eq!(merged.replacement.abilities.unwrap().len(), 1);
    }

    #[test]
    fn test_skill_proposal_keeps_pinned_entries() {
        let state = CharacterState::new().with_skills(vec![
            SkillEntry::new("skill-fight", "Fight", 2).with_user_edited(true),
            SkillEntry::new("skill-shoot", "Shoot", 1),
            SkillEntry::new("skill-lore", "Lore", 1),
        ]);

        let merged = merge_skills(
            &state,
            vec![
                skill(Some("skill-fight"), None, Some(4)),
                skill(None, Some("Notice"), Some(1)),
                skill(None, Some("Will"), Some(1)),
            ],
            false,
        )
        .unwrap();

        let skills = merged.replacement.skills.unwrap();
        let fight = skills.iter().find(|s| s.id.as_str() == "skill-fight").unwrap();
        assert_eq!(fight.rank, 2);
        assert!(skills.iter().all(|s| s.name != "Shoot"));
        assert!(is_valid_distribution(&skills, LadderType::OneToFour));
        assert_eq!(merged.report.skipped, 1);
    }

    #[test]
    fn test_unbalanceable_skill_proposal_is_rejected() {
        let state = CharacterState::new().with_skills(vec![
            SkillEntry::new("skill-fight", "Fight", 4).with_locked(true),
            SkillEntry::new("skill-shoot", "Shoot", 4).with_locked(true),
        ]);

        let result = merge_skills(&state, vec![skill(None, Some("Notice"), Some(1))], false);

        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }

    #[test]
    fn test_empty_skill_proposal_changes_nothing() {
        let merged = merge_skills(&CharacterState::sample(), Vec::new(), false).unwrap();
        assert!(merged.is_empty());
    }
}
